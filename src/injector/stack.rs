use crate::{BindingKey, Dependency, ServiceInfo};
use parking_lot::Mutex;
use std::fmt::{Display, Formatter};

/// A constructor or factory being invoked through injection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct CallTarget {
    owner: Option<ServiceInfo>,
    callable: &'static str,
}

impl CallTarget {
    pub fn new(owner: Option<ServiceInfo>, callable: &'static str) -> Self {
        CallTarget { owner, callable }
    }
}

impl Display for CallTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.owner {
            Some(owner) => write!(f, "{}::{}", owner.name(), self.callable),
            None => write!(f, "{}", self.callable),
        }
    }
}

/// An in-flight resolution of a callable's dependencies. Two frames are
/// equal only if they resolve the same dependencies for the same callable,
/// so re-entering a constructor with some arguments supplied is not a
/// cycle.
#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) struct Frame {
    target: CallTarget,
    dependencies: Vec<(&'static str, BindingKey)>,
}

impl Frame {
    pub fn new(target: CallTarget, dependencies: &[&Dependency]) -> Self {
        let mut dependencies: Vec<_> = dependencies
            .iter()
            .map(|dependency| (dependency.name(), dependency.requirement().key()))
            .collect();
        dependencies.sort_unstable();
        Frame {
            target,
            dependencies,
        }
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(injecting {{", self.target)?;
        for (index, (name, key)) in self.dependencies.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, key)?;
        }
        write!(f, "}})")
    }
}

/// Pops the frame it was created for when dropped.
pub(crate) struct StackGuard<'a> {
    stack: &'a Mutex<Vec<Frame>>,
}

impl<'a> StackGuard<'a> {
    pub fn new(stack: &'a Mutex<Vec<Frame>>) -> Self {
        StackGuard { stack }
    }
}

impl Drop for StackGuard<'_> {
    fn drop(&mut self) {
        self.stack.lock().pop();
    }
}
