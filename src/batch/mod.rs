//! Batch scripts.
//!
//! A batch script is a list of statements, one per line, run against a
//! pipeline value:
//!
//! ```text
//! # comment
//! properties env=@conf/env.properties
//! useAsInput @petstore.yaml
//! list paths.*.*
//! foreach
//!   print ${foreach.index}: !foreach.iteration.value\n
//! end
//! saveTo !operations
//! ```
//!
//! Lines that are not one of the statements below are command lines for the
//! [`YamlCommand`](crate::command::YamlCommand) grammar (`read`, `insert`, ...).
//!
//! | Statement | Effect |
//! |-----------|--------|
//! | `properties name=<ref>` | load a property set |
//! | `setProperty key=value` | set one property |
//! | `print <expr>` | print text, `-` (pipeline) or `!name` (memory) |
//! | `saveTo <ref>` | save the pipeline to a file or memory |
//! | `useAsInput <ref>` | replace the pipeline |
//! | `foreach` ... `end` | run the body once per element |
//! | `batch <path>` | run another script |

pub mod error;
pub mod interpreter;
pub mod properties;
pub mod script;
pub mod statement;

pub use error::{BatchErrorKind, BatchFileError};
pub use interpreter::{BatchInterpreter, FOREACH_INDEX, FOREACH_KEY, FOREACH_VALUE};
pub use properties::PropertySets;
pub use script::BatchScript;
pub use statement::BatchStatement;
