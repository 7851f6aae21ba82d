//! Source file fixtures

/// `#metacode` block declaring the ENUM macro and a cat breed table, up to
/// and including the `#metagen` line
pub const CAT_BREEDS_HEADER: &str = r#"// #metacode
// #macro ENUM(name,t)
//   // {{name}}.h
//   typedef enum
//   {
//     {{~#for _i,r of t~}}
//     {{name}}_{{r.k}},
//     {{~/for~}}
//     {{name}}__COUNT
//   } {{name}};
//
//   extern char* {{name}}__STRINGS[{{#t}}];
//
//   // {{name}}.c
//   char* {{name}}__STRINGS[{{#t}}] =
//   {
//     {{~#for r of t~}}
//     "{{r.k}}",
//     {{~/for~}}
//   };
//
// #table T_CAT_BREEDS
//   k          |
//   Persian    |
//   MaineCoon  |
//   Siamese    |
//   Bengal     |
//
// ENUM(CatBreed, T_CAT_BREEDS)
// #metagen
"#;

/// Generated text for [`CAT_BREEDS_HEADER`]
pub const CAT_BREEDS_GENERATED: &str = r#"// CatBreed.h
typedef enum
{
  CatBreed_Persian,
  CatBreed_MaineCoon,
  CatBreed_Siamese,
  CatBreed_Bengal,
  CatBreed__COUNT
} CatBreed;

extern char* CatBreed__STRINGS[4];

// CatBreed.c
char* CatBreed__STRINGS[4] =
{
  "Persian",
  "MaineCoon",
  "Siamese",
  "Bengal",
};
"#;

/// Header followed by an out-of-date generated region
pub const CAT_BREEDS_STALE: &str = r#"// #metacode
// #macro ENUM(name,t)
//   // {{name}}.h
//   typedef enum
//   {
//     {{~#for _i,r of t~}}
//     {{name}}_{{r.k}},
//     {{~/for~}}
//     {{name}}__COUNT
//   } {{name}};
//
//   extern char* {{name}}__STRINGS[{{#t}}];
//
//   // {{name}}.c
//   char* {{name}}__STRINGS[{{#t}}] =
//   {
//     {{~#for r of t~}}
//     "{{r.k}}",
//     {{~/for~}}
//   };
//
// #table T_CAT_BREEDS
//   k          |
//   Persian    |
//   MaineCoon  |
//   Siamese    |
//   Bengal     |
//
// ENUM(CatBreed, T_CAT_BREEDS)
// #metagen
typedef enum { CatBreed_Persian } CatBreed;
// #metaend"#;

/// [`CAT_BREEDS_STALE`] after expansion
pub const CAT_BREEDS_EXPANDED: &str = r#"// #metacode
// #macro ENUM(name,t)
//   // {{name}}.h
//   typedef enum
//   {
//     {{~#for _i,r of t~}}
//     {{name}}_{{r.k}},
//     {{~/for~}}
//     {{name}}__COUNT
//   } {{name}};
//
//   extern char* {{name}}__STRINGS[{{#t}}];
//
//   // {{name}}.c
//   char* {{name}}__STRINGS[{{#t}}] =
//   {
//     {{~#for r of t~}}
//     "{{r.k}}",
//     {{~/for~}}
//   };
//
// #table T_CAT_BREEDS
//   k          |
//   Persian    |
//   MaineCoon  |
//   Siamese    |
//   Bengal     |
//
// ENUM(CatBreed, T_CAT_BREEDS)
// #metagen
// CatBreed.h
typedef enum
{
  CatBreed_Persian,
  CatBreed_MaineCoon,
  CatBreed_Siamese,
  CatBreed_Bengal,
  CatBreed__COUNT
} CatBreed;

extern char* CatBreed__STRINGS[4];

// CatBreed.c
char* CatBreed__STRINGS[4] =
{
  "Persian",
  "MaineCoon",
  "Siamese",
  "Bengal",
};
// #metaend"#;

/// Plain source without any `#metacode` block
pub const PLAIN_SOURCE: &str = "int main(void)\n{\n  return 0;\n}\n";
