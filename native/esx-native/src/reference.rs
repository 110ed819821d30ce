//! Per-unit identity slots and the one-time support module decision.
//!
//! One allocator per compilation unit. Nothing in here is shared across
//! units, so independent units can be lowered on separate threads.

use serde::Serialize;
use std::collections::HashSet;

use crate::options::SupportModuleMode;
use crate::support::SupportInjection;

pub const REFERENCE_PREFIX: &str = "_templateReference";

/// Identity slot of one markup root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TemplateReference {
    /// Value of the allocator counter when this slot was minted (1-based).
    pub index: u32,
    pub name: String,
}

#[derive(Debug)]
pub struct ReferenceAllocator {
    mode: SupportModuleMode,
    support_source: String,
    reserved: HashSet<String>,
    support_bound: bool,
    counter: u32,
    issued: Vec<TemplateReference>,
    injected: bool,
}

impl ReferenceAllocator {
    pub fn new(mode: SupportModuleMode, support_source: &str) -> Self {
        Self {
            mode,
            support_source: support_source.to_string(),
            reserved: HashSet::new(),
            support_bound: false,
            counter: 0,
            issued: Vec::new(),
            injected: false,
        }
    }

    /// Names already taken in the unit; minted names skip them.
    pub fn with_reserved_names(mut self, names: HashSet<String>) -> Self {
        self.reserved = names;
        self
    }

    /// The unit already binds the support module at top level.
    pub fn with_support_bound(mut self, bound: bool) -> Self {
        self.support_bound = bound;
        self
    }

    fn render(&self, index: u32) -> String {
        if index == 1 {
            REFERENCE_PREFIX.to_string()
        } else {
            format!("{}{}", REFERENCE_PREFIX, index)
        }
    }

    /// Mints the next identity slot.
    pub fn next_id(&mut self) -> TemplateReference {
        loop {
            self.counter += 1;
            let name = self.render(self.counter);
            if !self.reserved.contains(&name) {
                let reference = TemplateReference {
                    index: self.counter,
                    name,
                };
                self.issued.push(reference.clone());
                return reference;
            }
        }
    }

    /// Every slot minted so far, in minting order.
    pub fn references(&self) -> &[TemplateReference] {
        &self.issued
    }

    pub fn is_injected(&self) -> bool {
        self.injected
    }

    /// Decides the support module injection for this unit. Only the first
    /// call can return `Some`; the flag is consumed even when nothing needs
    /// injecting (mode `none` or an existing binding).
    pub fn ensure_support_module(&mut self) -> Option<SupportInjection> {
        if self.injected {
            return None;
        }
        self.injected = true;

        if self.support_bound {
            return None;
        }
        match self.mode {
            SupportModuleMode::None => None,
            SupportModuleMode::Inline => Some(SupportInjection::Inline),
            SupportModuleMode::Import => Some(SupportInjection::Import {
                source: self.support_source.clone(),
            }),
        }
    }
}
