//! File I/O and the bridge to `serde_yaml`

pub mod bridge;
pub mod reader;
pub mod resolver;
pub mod writer;

pub use bridge::{tree_to_value, tree_to_value_with_limit, value_to_tree, DEFAULT_ALIAS_EXPANSION_LIMIT};
pub use reader::{ReaderConfig, YamlReader};
pub use resolver::{FileResolver, ResolverConfig};
pub use writer::{WriteResult, WriterConfig, YamlWriter};
