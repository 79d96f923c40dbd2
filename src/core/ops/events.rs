//! Registry change notifications

/// Emitted by an operation registry around every mutation.
///
/// `Before*` events fire while the registry still holds its previous state;
/// `After*` events fire once the mutation is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    BeforeAdd {
        name: String,
    },
    AfterAdd {
        name: String,
        position: usize,
    },
    BeforeRemove {
        name: String,
    },
    AfterRemove {
        name: String,
    },
    BeforeReorder {
        name: String,
        position: usize,
    },
    AfterReorder {
        name: String,
        old_position: usize,
        new_position: usize,
    },
    BeforeClear,
    AfterClear,
}
