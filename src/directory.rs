use serde::{Deserialize, Serialize};

use crate::types::CustomerId;

/// customer identity as reporting sees it; the system of record for
/// customers lives outside this crate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: CustomerId,
    pub name: String,
    pub phone_number: String,
    pub address: String,
    pub area: String,
}

impl CustomerProfile {
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        phone_number: impl Into<String>,
        address: impl Into<String>,
        area: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            phone_number: phone_number.into(),
            address: address.into(),
            area: area.into(),
        }
    }
}

/// read-only lookup of customer profiles
pub trait CustomerDirectory {
    /// profile for a customer id, when known
    fn profile(&self, id: CustomerId) -> Option<&CustomerProfile>;

    /// distinct areas served, for report filter menus
    fn areas(&self) -> Vec<String>;

    /// reporting area for a customer, when known
    fn area_of(&self, id: CustomerId) -> Option<&str> {
        self.profile(id).map(|p| p.area.as_str())
    }

    /// display name for a customer, when known
    fn name_of(&self, id: CustomerId) -> Option<&str> {
        self.profile(id).map(|p| p.name.as_str())
    }
}

/// directory backed by a plain vector, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    customers: Vec<CustomerProfile>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, profile: CustomerProfile) -> CustomerId {
        let id = profile.id;
        if let Some(existing) = self.customers.iter_mut().find(|c| c.id == id) {
            *existing = profile;
        } else {
            self.customers.push(profile);
        }
        id
    }

    pub fn remove(&mut self, id: CustomerId) -> Option<CustomerProfile> {
        let position = self.customers.iter().position(|c| c.id == id)?;
        Some(self.customers.remove(position))
    }

    pub fn all(&self) -> &[CustomerProfile] {
        &self.customers
    }
}

impl CustomerDirectory for InMemoryDirectory {
    fn profile(&self, id: CustomerId) -> Option<&CustomerProfile> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// distinct areas in insertion order
    fn areas(&self) -> Vec<String> {
        let mut areas: Vec<String> = Vec::new();
        for customer in &self.customers {
            if !areas.contains(&customer.area) {
                areas.push(customer.area.clone());
            }
        }
        areas
    }
}
