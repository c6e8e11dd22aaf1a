//! Open extension points of the closed node model.
//!
//! Dialects and applications add nodes without touching the closed
//! taxonomy by implementing one of the traits below. An interpreter
//! recognizes the subtypes it knows through [`Any`] downcasting and
//! rejects the rest.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::dialect::Dialect;

use super::function::Arity;

/// A node outside the closed taxonomy.
///
/// Appears in expression or statement position. A node that knows how to
/// render itself for a dialect returns `Some` from [`CustomNode::render`].
pub trait CustomNode: fmt::Debug + Send + Sync {
    /// Returns a short name for diagnostics.
    fn name(&self) -> &str;

    /// Upcasts for downcasting by interpreters.
    fn as_any(&self) -> &dyn Any;

    /// Renders the node for `dialect`, if it can.
    fn render(&self, dialect: &dyn Dialect) -> Option<String> {
        let _ = dialect;
        None
    }
}

/// A scalar function outside the closed function set.
///
/// Arguments live on the enclosing [`ScalarFunction`](super::ScalarFunction).
pub trait CustomFunction: fmt::Debug + Send + Sync {
    /// Returns the function name for diagnostics.
    fn name(&self) -> &str;

    /// Returns the accepted argument counts.
    fn arity(&self) -> Arity {
        Arity::AtLeast(0)
    }

    /// Upcasts for downcasting by interpreters.
    fn as_any(&self) -> &dyn Any;
}

/// An aggregate function outside the closed aggregate set.
pub trait CustomAggregate: fmt::Debug + Send + Sync {
    /// Returns the aggregate name for diagnostics.
    fn name(&self) -> &str;

    /// Returns the accepted argument counts.
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    /// Upcasts for downcasting by interpreters.
    fn as_any(&self) -> &dyn Any;
}

macro_rules! custom_ref {
    ($(#[$meta:meta])* $name:ident => $trait_:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(Arc<dyn $trait_>);

        impl $name {
            /// Wraps an extension value.
            #[must_use]
            pub fn new(value: impl $trait_ + 'static) -> Self {
                Self(Arc::new(value))
            }

            /// Wraps a shared extension value.
            #[must_use]
            pub fn from_arc(value: Arc<dyn $trait_>) -> Self {
                Self(value)
            }

            /// Returns the concrete value if it is a `T`.
            #[must_use]
            pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
                self.0.as_any().downcast_ref::<T>()
            }
        }

        impl std::ops::Deref for $name {
            type Target = dyn $trait_;

            fn deref(&self) -> &Self::Target {
                &*self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(&*self.0, f)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0)
                    || (self.0.name() == other.0.name()
                        && Any::type_id(self.0.as_any()) == Any::type_id(other.0.as_any()))
            }
        }
    };
}

custom_ref! {
    /// Shared handle to a [`CustomNode`].
    CustomNodeRef => CustomNode
}

custom_ref! {
    /// Shared handle to a [`CustomFunction`].
    CustomFunctionRef => CustomFunction
}

custom_ref! {
    /// Shared handle to a [`CustomAggregate`].
    CustomAggregateRef => CustomAggregate
}
