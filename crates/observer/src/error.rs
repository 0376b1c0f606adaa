use bindpath_traits::AccessError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObserverError {
    #[error("Cannot resolve member '{member}' on '{type_name}' in path '{path}'")]
    MemberNotFound {
        member: String,
        type_name: String,
        path: String,
    },

    #[error("Member '{member}' is null in path '{path}'")]
    NullIntermediate { member: String, path: String },

    #[error("The target of path '{path}' is no longer alive")]
    TargetDisposed { path: String },

    #[error("Observer for path '{path}' is disposed")]
    Disposed { path: String },

    #[error("Cannot read path '{path}': {source}")]
    Access {
        path: String,
        #[source]
        source: AccessError,
    },
}

impl ObserverError {
    pub fn null_intermediate(member: impl Into<String>, path: impl Into<String>) -> Self {
        Self::NullIntermediate {
            member: member.into(),
            path: path.into(),
        }
    }

    pub fn target_disposed(path: impl Into<String>) -> Self {
        Self::TargetDisposed { path: path.into() }
    }

    pub fn disposed(path: impl Into<String>) -> Self {
        Self::Disposed { path: path.into() }
    }

    /// Wraps a host accessor failure, keeping member lookups distinct.
    pub fn access(path: impl Into<String>, source: AccessError) -> Self {
        let path = path.into();
        match source {
            AccessError::MemberNotFound { member, type_name } => Self::MemberNotFound {
                member,
                type_name,
                path,
            },
            source => Self::Access { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_errors_keep_member_lookups_distinct() {
        let not_found = ObserverError::access("A.B", AccessError::member_not_found("B", "Root"));
        assert_eq!(
            not_found.to_string(),
            "Cannot resolve member 'B' on 'Root' in path 'A.B'"
        );
        let host = ObserverError::access("A.B", AccessError::host("boom"));
        assert!(matches!(host, ObserverError::Access { .. }));
        assert!(host.to_string().contains("boom"));
    }
}
