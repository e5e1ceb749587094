//! Related-entity field catalog.
//!
//! For each business entity the catalog lists, per related entity, the
//! default set of fields a workflow should fetch. It is plain configuration
//! data: built-in defaults can be replaced wholesale from a JSON document of
//! the same shape.
//!
//! ```json
//! {
//!   "PlacementCommission": {
//!     "placement_commission": ["id", "status", "placement(id)"],
//!     "user": ["id", "name", "email"]
//!   }
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::field::{FieldExpr, FieldExprError};

/// Related-entity key → default fields to fetch.
pub type RelatedFields = BTreeMap<String, BTreeSet<String>>;

/// Error raised when a catalog entry holds an invalid field expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field '{field}' in {entity}.{related}: {source}")]
pub struct CatalogError {
    pub entity: EntityType,
    pub related: String,
    pub field: String,
    #[source]
    pub source: FieldExprError,
}

/// Immutable mapping from entity type to its related-entity field sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    entries: BTreeMap<EntityType, RelatedFields>,
}

impl FieldCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the field set for one related entity.
    pub fn with_fields<I, S>(mut self, entity: EntityType, related: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(entity)
            .or_default()
            .insert(related.to_string(), fields.into_iter().map(Into::into).collect());
        self
    }

    /// The default catalog shipped with the service.
    pub fn builtin() -> Self {
        Self::new()
            .with_fields(
                EntityType::PlacementCommission,
                "placement_commission",
                ["id", "role", "commissionPercentage", "status", "placement(id)", "user(id,name)"],
            )
            .with_fields(EntityType::PlacementCommission, "user", ["id", "name", "email"])
            .with_fields(
                EntityType::PlacementCommission,
                "placement",
                [
                    "id",
                    "status",
                    "dateBegin",
                    "dateEnd",
                    "payRate",
                    "clientBillRate",
                    "employmentType",
                    "jobSubmission(id,status)",
                    "jobOrder(id,title)",
                    "candidate(id,name)",
                ],
            )
            .with_fields(
                EntityType::PlacementCommission,
                "job_submission",
                ["id", "status", "sendingUser(id,name)"],
            )
            .with_fields(
                EntityType::PlacementCommission,
                "job_submission_sending_user",
                ["id", "name", "email"],
            )
            .with_fields(
                EntityType::PlacementCommission,
                "job_order",
                [
                    "id",
                    "title",
                    "employmentType",
                    "clientContact(id,name)",
                    "clientCorporation(id,name)",
                    "owner(id,name)",
                ],
            )
            .with_fields(
                EntityType::PlacementCommission,
                "client_contact",
                ["id", "name", "email", "phone", "clientCorporation(id,name)"],
            )
            .with_fields(EntityType::PlacementCommission, "client_corporation", ["id", "name"])
            .with_fields(EntityType::PlacementCommission, "job_owner", ["id", "name", "email"])
            .with_fields(
                EntityType::PlacementCommission,
                "candidate",
                ["id", "name", "email", "phone", "owner(id,name)"],
            )
            .with_fields(EntityType::PlacementCommission, "candidate_owner", ["id", "name", "email"])
            .with_fields(
                EntityType::Placement,
                "placement",
                ["id", "status", "dateBegin", "dateEnd", "candidate(id,name)", "jobOrder(id,title)"],
            )
            .with_fields(EntityType::Placement, "candidate", ["id", "name", "email", "owner(id,name)"])
            .with_fields(EntityType::Placement, "job_order", ["id", "title", "owner(id,name)"])
            .with_fields(
                EntityType::Candidate,
                "candidate",
                ["id", "name", "email", "phone", "status", "owner(id,name)"],
            )
            .with_fields(EntityType::Candidate, "candidate_owner", ["id", "name", "email"])
            .with_fields(
                EntityType::CandidateEducation,
                "candidate_education",
                ["id", "school", "degree", "graduationDate", "candidate(id)"],
            )
            .with_fields(EntityType::CandidateEducation, "candidate", ["id", "name", "email"])
            .with_fields(
                EntityType::CorporateUser,
                "corporate_user",
                ["id", "name", "email", "enabled"],
            )
            .with_fields(
                EntityType::JobOrder,
                "job_order",
                ["id", "title", "status", "employmentType", "clientCorporation(id,name)", "owner(id,name)"],
            )
            .with_fields(EntityType::JobOrder, "client_corporation", ["id", "name"])
            .with_fields(
                EntityType::BillMaster,
                "bill_master",
                ["id", "chargeTypeLookup(id)", "billingSyncBatch(id)", "transactionStatus"],
            )
    }

    /// Checks that every field of every entry parses as a [`FieldExpr`].
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (entity, related_fields) in &self.entries {
            for (related, fields) in related_fields {
                for field in fields {
                    field.parse::<FieldExpr>().map_err(|source| CatalogError {
                        entity: *entity,
                        related: related.clone(),
                        field: field.clone(),
                        source,
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Returns all related-entity field sets configured for an entity.
    pub fn related_fields(&self, entity: EntityType) -> Option<&RelatedFields> {
        self.entries.get(&entity)
    }

    /// Returns the default fields of one related entity.
    pub fn default_fields(&self, entity: EntityType, related: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(&entity).and_then(|r| r.get(related))
    }

    /// Returns the entity types that have catalog entries.
    pub fn entity_types(&self) -> impl Iterator<Item = EntityType> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = FieldCatalog::builtin();
        assert!(catalog.validate().is_ok());
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_default_fields_lookup() {
        let catalog = FieldCatalog::builtin();
        let fields = catalog
            .default_fields(EntityType::PlacementCommission, "user")
            .unwrap();
        assert_eq!(
            fields.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["email", "id", "name"]
        );
        assert!(catalog
            .default_fields(EntityType::PlacementCommission, "timesheet")
            .is_none());
        assert!(catalog.related_fields(EntityType::ClientContact).is_none());
    }

    #[test]
    fn test_validate_rejects_bad_field() {
        let catalog = FieldCatalog::new().with_fields(EntityType::Candidate, "candidate", ["id", "owner(id"]);
        let err = catalog.validate().unwrap_err();
        assert_eq!(err.entity, EntityType::Candidate);
        assert_eq!(err.field, "owner(id");
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "Candidate": { "candidate": ["id", "name"] },
            "CorporateUser": { "corporate_user": ["id"] }
        }"#;
        let catalog: FieldCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog
                .default_fields(EntityType::Candidate, "candidate")
                .map(|f| f.len()),
            Some(2)
        );
        assert_eq!(
            catalog.entity_types().collect::<Vec<_>>(),
            vec![EntityType::Candidate, EntityType::CorporateUser]
        );
    }
}
