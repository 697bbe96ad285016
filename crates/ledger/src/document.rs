use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockplan_core::{DocumentRef, Entity, PlanError};

/// Closed set of documents that move material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "MO")]
    ManufacturingOrder,
    #[serde(rename = "PO")]
    PurchaseOrder,
    #[serde(rename = "DO")]
    DistributionOrder,
    #[serde(rename = "DLVR")]
    Delivery,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::ManufacturingOrder,
        DocumentType::PurchaseOrder,
        DocumentType::DistributionOrder,
        DocumentType::Delivery,
    ];

    pub fn code(self) -> &'static str {
        match self {
            DocumentType::ManufacturingOrder => "MO",
            DocumentType::PurchaseOrder => "PO",
            DocumentType::DistributionOrder => "DO",
            DocumentType::Delivery => "DLVR",
        }
    }

    /// Deliveries complete instantly; they are never work in progress.
    pub fn has_pending_state(self) -> bool {
        !matches!(self, DocumentType::Delivery)
    }

    fn index(self) -> usize {
        match self {
            DocumentType::ManufacturingOrder => 0,
            DocumentType::PurchaseOrder => 1,
            DocumentType::DistributionOrder => 2,
            DocumentType::Delivery => 3,
        }
    }
}

impl core::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DocumentType {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| PlanError::inconsistency(format!("unknown document type '{s}'")))
    }
}

/// Manufacturing/purchase/distribution order or sales delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub reference: DocumentRef,
    pub kind: DocumentType,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub quantity: Decimal,
}

impl Document {
    pub fn new(
        reference: impl Into<DocumentRef>,
        kind: DocumentType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        quantity: Decimal,
    ) -> Self {
        Self {
            reference: reference.into(),
            kind,
            start,
            end,
            quantity,
        }
    }

    /// Open across `boundary`: started before it and not finished before it.
    pub fn is_open_at(&self, boundary: DateTime<Utc>) -> bool {
        self.start < boundary && self.end >= boundary
    }
}

impl Entity for Document {
    type Id = DocumentRef;

    fn id(&self) -> &Self::Id {
        &self.reference
    }
}

/// One quantity per document type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedQuantities([Decimal; 4]);

impl TypedQuantities {
    pub fn add(&mut self, kind: DocumentType, quantity: Decimal) {
        self.0[kind.index()] += quantity;
    }

    pub fn get(&self, kind: DocumentType) -> Decimal {
        self.0[kind.index()]
    }

    pub fn total(&self) -> Decimal {
        self.0.iter().copied().sum()
    }
}
