//! CLI command implementations

pub mod check;
pub mod expand;
pub mod inspect;
pub mod watch;

use crate::context::Context;
use metacode_core::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Apply `op` to every file, in parallel unless disabled in the config
///
/// Results keep the order of `files`.
pub(crate) fn for_each_file<T, F>(files: &[PathBuf], ctx: &Context, op: F) -> Vec<Result<T>>
where
    T: Send,
    F: Fn(&Path) -> Result<T> + Sync,
{
    if ctx.config.expand.parallel && files.len() > 1 {
        files.par_iter().map(|path| op(path)).collect()
    } else {
        files.iter().map(|path| op(path)).collect()
    }
}
