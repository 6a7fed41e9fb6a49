//! Identifier newtypes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

id_type!(
    /// Identifies a stored [`RequestSpec`](super::RequestSpec).
    RequestId
);
id_type!(
    /// Identifies a collection of stored requests.
    CollectionId
);
id_type!(
    /// Identifies a workspace.
    WorkspaceId
);
id_type!(
    /// Identifies an authenticated platform user.
    UserId
);
id_type!(
    /// Identifies a [`WebhookEndpoint`](super::WebhookEndpoint).
    EndpointId
);
id_type!(
    /// Identifies an [`ExecutionRecord`](super::ExecutionRecord).
    ExecutionId
);
id_type!(
    /// Identifies a [`WebhookRequestLog`](super::WebhookRequestLog).
    LogId
);
