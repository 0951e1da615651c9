use crate::hierarchy::HierarchyError;
use crate::kernel::KernelError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors of a reconstruction run
///
/// Every variant aborts the run; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no contour files named NNNN.{extension} in {}", dir.display())]
    EmptyStack { dir: PathBuf, extension: String },

    #[error("layer {index} of the stack is missing, expected {}", expected.display())]
    MissingIndex { index: usize, expected: PathBuf },

    #[error("failed to read contour directory {}", dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("layer {layer} has an invalid loop hierarchy")]
    Hierarchy {
        layer: usize,
        #[source]
        source: HierarchyError,
    },

    #[error("failed to import layer {layer} from {}", path.display())]
    ImportFailed {
        layer: usize,
        path: PathBuf,
        #[source]
        source: KernelError,
    },

    #[error("failed to extrude layer {layer}")]
    ExtrudeFailed {
        layer: usize,
        #[source]
        source: KernelError,
    },
}

/// Error taxonomy entry, independent of context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyStack,
    MissingIndex,
    ReadDir,
    MalformedProfile,
    DuplicateLoopKey,
    DegenerateLoop,
    CyclicNesting,
    ImportFailed,
    ExtrudeFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyStack { .. } => ErrorKind::EmptyStack,
            Error::MissingIndex { .. } => ErrorKind::MissingIndex,
            Error::ReadDir { .. } => ErrorKind::ReadDir,
            Error::Hierarchy { source, .. } => match source {
                HierarchyError::MalformedProfile { .. } => ErrorKind::MalformedProfile,
                HierarchyError::DuplicateLoopKey { .. } => ErrorKind::DuplicateLoopKey,
                HierarchyError::DegenerateLoop { .. } => ErrorKind::DegenerateLoop,
                HierarchyError::CyclicNesting { .. } => ErrorKind::CyclicNesting,
            },
            Error::ImportFailed { .. } => ErrorKind::ImportFailed,
            Error::ExtrudeFailed { .. } => ErrorKind::ExtrudeFailed,
        }
    }

    /// Layer the error happened on, for errors raised while processing a layer
    pub fn layer(&self) -> Option<usize> {
        match self {
            Error::Hierarchy { layer, .. }
            | Error::ImportFailed { layer, .. }
            | Error::ExtrudeFailed { layer, .. } => Some(*layer),
            _ => None,
        }
    }

    /// One-line report: error kind followed by the whole cause chain
    pub fn report(&self) -> String {
        let mut message = format!("{}: {}", self.kind(), self);
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoopKey;
    use crate::hierarchy::LoopRole;

    #[test]
    fn test_kind_follows_hierarchy_cause() {
        let err = Error::Hierarchy {
            layer: 4,
            source: HierarchyError::DuplicateLoopKey {
                profile: 2,
                key: LoopKey::new(1.0, 2.0),
                role: LoopRole::Inner,
            },
        };
        assert_eq!(err.kind(), ErrorKind::DuplicateLoopKey);
        assert_eq!(err.layer(), Some(4));
        assert_eq!(
            err.report(),
            "DuplicateLoopKey: layer 4 has an invalid loop hierarchy: \
             inner loop key (1, 2) of profile #2 is already registered"
        );
    }

    #[test]
    fn test_report_without_cause() {
        let err = Error::MissingIndex {
            index: 2,
            expected: PathBuf::from("stack/0002.svg"),
        };
        assert_eq!(err.kind(), ErrorKind::MissingIndex);
        assert_eq!(err.layer(), None);
        assert_eq!(
            err.report(),
            "MissingIndex: layer 2 of the stack is missing, expected stack/0002.svg"
        );
    }
}
