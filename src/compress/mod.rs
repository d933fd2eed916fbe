pub mod dictionary;
pub mod pipeline;
pub mod prefix;

pub use dictionary::Dictionary;
pub use pipeline::{
    compress_blob, decompress_blob, sniff_content_type, PipelineOptions, CONTENT_BINARY, CONTENT_JSON, CONTENT_TEXT,
    METHOD_DICTIONARY, METHOD_DICTIONARY_EXTERNAL, METHOD_EXTERNAL, METHOD_NONE,
};
pub use prefix::SymbolTree;
