//! Registry of declaration providers keyed by document applicability.

use std::fmt;

use tracing::debug;

use crate::DECLARATIONS_TARGET;
use crate::document::Document;
use crate::provider::DeclarationProvider;
use crate::selector::DocumentSelector;

/// Identifier handed out on registration and used to unregister.
///
/// Identifiers grow monotonically, so they also encode registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderId(u64);

impl fmt::Display for ProviderId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "provider#{}", self.0)
    }
}

struct Entry {
    id: ProviderId,
    selector: DocumentSelector,
    provider: Box<dyn DeclarationProvider>,
}

/// Ordered collection of declaration providers.
///
/// Construct one per editor instance and share it by reference; registration
/// needs `&mut self`, so it cannot overlap with a query borrowing the registry.
#[derive(Default)]
pub struct DeclarationRegistry {
    entries: Vec<Entry>,
    next_id: u64,
}

impl DeclarationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider for the documents matched by `selector`.
    ///
    /// The same provider may be registered any number of times.
    pub fn register(
        &mut self,
        selector: DocumentSelector,
        provider: Box<dyn DeclarationProvider>,
    ) -> ProviderId {
        let id = ProviderId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        debug!(
            target: DECLARATIONS_TARGET,
            provider = %id,
            selector = %selector,
            "declaration provider registered"
        );
        self.entries.push(Entry {
            id,
            selector,
            provider,
        });
        id
    }

    /// Removes a registration; returns whether it was present.
    pub fn unregister(&mut self, id: ProviderId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() != before;
        if removed {
            debug!(target: DECLARATIONS_TARGET, provider = %id, "declaration provider unregistered");
        }
        removed
    }

    /// Providers applicable to `document`, most specific first.
    ///
    /// Providers whose selector does not match are skipped. Equal scores are
    /// ordered most recently registered first, so the order is fully
    /// determined by the registration history.
    #[must_use]
    pub fn ordered(&self, document: &Document) -> OrderedProviders<'_> {
        let mut scored: Vec<(u8, &Entry)> = self
            .entries
            .iter()
            .filter_map(|entry| match entry.selector.score(document) {
                0 => None,
                score => Some((score, entry)),
            })
            .collect();
        scored.sort_by(|(left_score, left), (right_score, right)| {
            right_score
                .cmp(left_score)
                .then_with(|| right.id.cmp(&left.id))
        });
        let providers: Vec<ProviderRef<'_>> = scored
            .into_iter()
            .map(|(_, entry)| ProviderRef {
                id: entry.id,
                provider: entry.provider.as_ref(),
            })
            .collect();
        OrderedProviders {
            inner: providers.into_iter(),
        }
    }

    /// Returns `true` when at least one provider applies to `document`.
    #[must_use]
    pub fn has(&self, document: &Document) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.selector.score(document) > 0)
    }

    /// Number of registrations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for DeclarationRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DeclarationRegistry")
            .field("providers", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

/// Borrowed view of a registered provider.
#[derive(Clone, Copy)]
pub struct ProviderRef<'a> {
    id: ProviderId,
    provider: &'a dyn DeclarationProvider,
}

impl<'a> ProviderRef<'a> {
    /// Registration identifier.
    #[must_use]
    pub const fn id(&self) -> ProviderId {
        self.id
    }

    /// The provider itself.
    #[must_use]
    pub const fn provider(&self) -> &'a dyn DeclarationProvider {
        self.provider
    }
}

impl fmt::Debug for ProviderRef<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("ProviderRef")
            .field(&self.id)
            .finish()
    }
}

/// Finite, restartable sequence of applicable providers.
///
/// Cloning yields an independent iterator over the same snapshot.
#[derive(Debug, Clone)]
pub struct OrderedProviders<'a> {
    inner: std::vec::IntoIter<ProviderRef<'a>>,
}

impl<'a> Iterator for OrderedProviders<'a> {
    type Item = ProviderRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for OrderedProviders<'_> {}
