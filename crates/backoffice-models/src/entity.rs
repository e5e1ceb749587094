//! Business entity types known to the back-office.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Business entity types exposed by the staffing platform.
///
/// Serialized by the platform's own entity name (`"Placement"`,
/// `"CorporateUser"`, ...), which is also what subscription events carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Candidate,
    CandidateEducation,
    ClientContact,
    ClientCorporation,
    CorporateUser,
    JobOrder,
    JobSubmission,
    Placement,
    PlacementCertification,
    PlacementCommission,
    BillMaster,
}

impl EntityType {
    /// Every entity type, in declaration order.
    pub const ALL: [EntityType; 11] = [
        EntityType::Candidate,
        EntityType::CandidateEducation,
        EntityType::ClientContact,
        EntityType::ClientCorporation,
        EntityType::CorporateUser,
        EntityType::JobOrder,
        EntityType::JobSubmission,
        EntityType::Placement,
        EntityType::PlacementCertification,
        EntityType::PlacementCommission,
        EntityType::BillMaster,
    ];

    /// Returns the platform name of the entity.
    pub fn name(&self) -> &'static str {
        match self {
            EntityType::Candidate => "Candidate",
            EntityType::CandidateEducation => "CandidateEducation",
            EntityType::ClientContact => "ClientContact",
            EntityType::ClientCorporation => "ClientCorporation",
            EntityType::CorporateUser => "CorporateUser",
            EntityType::JobOrder => "JobOrder",
            EntityType::JobSubmission => "JobSubmission",
            EntityType::Placement => "Placement",
            EntityType::PlacementCertification => "PlacementCertification",
            EntityType::PlacementCommission => "PlacementCommission",
            EntityType::BillMaster => "BillMaster",
        }
    }

    /// Returns the key under which the entity's own fields are listed in
    /// the field catalog (and the name of its storage table).
    pub fn catalog_key(&self) -> &'static str {
        match self {
            EntityType::Candidate => "candidate",
            EntityType::CandidateEducation => "candidate_education",
            EntityType::ClientContact => "client_contact",
            EntityType::ClientCorporation => "client_corporation",
            EntityType::CorporateUser => "corporate_user",
            EntityType::JobOrder => "job_order",
            EntityType::JobSubmission => "job_submission",
            EntityType::Placement => "placement",
            EntityType::PlacementCertification => "placement_certification",
            EntityType::PlacementCommission => "placement_commission",
            EntityType::BillMaster => "bill_master",
        }
    }

    /// Returns the storage table holding rows of this entity.
    pub fn table_name(&self) -> &'static str {
        self.catalog_key()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown entity name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity type: {0}")]
pub struct UnknownEntityType(pub String);

impl FromStr for EntityType {
    type Err = UnknownEntityType;

    /// Accepts either the platform name or the catalog key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .iter()
            .copied()
            .find(|e| e.name() == s || e.catalog_key() == s)
            .ok_or_else(|| UnknownEntityType(s.to_string()))
    }
}
