use enumset::EnumSetType;

/// The kinds of changes a set domain can undergo.
#[derive(Debug, EnumSetType, Hash)]
pub enum SetDomainEvent {
    /// An element of the envelope became mandatory.
    AddToKernel,
    /// An element was excluded from the envelope.
    RemoveFromEnvelope,
}
