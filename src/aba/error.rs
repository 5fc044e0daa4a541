use thiserror::Error;

/// The categories of errors raised by the reasoner.
///
/// Errors are propagated through [anyhow::Error]; callers may use `downcast_ref::<BabaError>()` to get the category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BabaError {
    /// The literals and rules given to build a framework are inconsistent.
    ///
    /// No framework is built when this error is raised.
    #[error("invalid framework: {reason} [{}]", .keys.join(", "))]
    Validation {
        /// What went wrong.
        reason: String,
        /// The keys of the offending literals.
        keys: Vec<String>,
    },
    /// A query was given a literal outside its domain.
    #[error("{operation}: {reason} [{}]", .keys.join(", "))]
    Domain {
        /// The query in which the error occurred.
        operation: &'static str,
        /// What went wrong.
        reason: String,
        /// The keys of the offending literals.
        keys: Vec<String>,
    },
    /// An unsupported semantics was requested.
    #[error(r#"unsupported semantics "{0}""#)]
    Semantics(String),
}

impl BabaError {
    pub(crate) fn validation<S, I, K>(reason: S, keys: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        BabaError::Validation {
            reason: reason.into(),
            keys: sorted_keys(keys),
        }
    }

    pub(crate) fn domain<S, I, K>(operation: &'static str, reason: S, keys: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        BabaError::Domain {
            operation,
            reason: reason.into(),
            keys: sorted_keys(keys),
        }
    }

    /// Returns the keys of the literals involved in this error.
    ///
    /// For semantics errors, the requested name is returned.
    pub fn keys(&self) -> Vec<&str> {
        match self {
            BabaError::Validation { keys, .. } | BabaError::Domain { keys, .. } => {
                keys.iter().map(|k| k.as_str()).collect()
            }
            BabaError::Semantics(name) => vec![name.as_str()],
        }
    }
}

fn sorted_keys<I, K>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    let mut keys = keys.into_iter().map(Into::into).collect::<Vec<String>>();
    keys.sort_unstable();
    keys.dedup();
    keys
}
