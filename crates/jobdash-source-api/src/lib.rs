pub mod classification;
pub mod error;
pub mod source;
pub mod types;

pub use classification::{
    folder_from_url,
    parse_keyword_list,
    ClassificationRules,
    DEFAULT_EXCLUDE_WORDS,
    DEFAULT_TEST_KEYWORDS,
};
pub use error::{
    SourceError,
    SourceResult,
};
pub use source::{
    JobSource,
    SourceKind,
    SourceMetadata,
};
pub use types::{
    BuildRef,
    RawBuild,
    RawFolderNode,
    RawJob,
    FOLDER_CLASS,
};
