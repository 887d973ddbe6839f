use std::fmt::Debug;

use uuid::Uuid;

use crate::validation::Validate;

/// Descriptor of one entity kind (Doctor, Patient, ...).
///
/// Ties together the three payload shapes handled by the lifecycle manager and
/// the pure mapping functions between them. Implementations are zero-sized
/// marker types; the service and stores are generic over them.
pub trait RecordKind: Send + Sync + 'static {
    /// Human-readable kind name used in messages and error codes ("Doctor").
    const NAME: &'static str;

    /// Persisted entity.
    type Record: Clone + Debug + PartialEq + Send + Sync + 'static;
    /// Creation payload; every required field is checked by its rule table.
    type New: Validate + Debug + Send + Sync + 'static;
    /// Partial update payload; absent fields leave the entity untouched.
    type Patch: Validate + Debug + Default + Send + Sync + 'static;

    fn id(record: &Self::Record) -> Uuid;

    /// Called by stores when a record is inserted.
    fn assign_id(record: &mut Self::Record, id: Uuid);

    /// The unique email of a record.
    fn email(record: &Self::Record) -> &str;

    /// The email a patch would set, if any.
    fn patch_email(patch: &Self::Patch) -> Option<&str>;

    /// Copy every field of the creation payload into a new entity.
    /// The identifier stays nil until the store assigns one.
    fn to_entity(new: Self::New) -> Self::Record;

    /// Overwrite exactly the fields present in `patch`.
    fn apply_update(record: Self::Record, patch: Self::Patch) -> Self::Record;
}
