// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Person, PersonId, Role};
use crate::validation::validate_person_fields;
use serde::Serialize;
use std::collections::HashSet;

/// The team as the rotation engine sees it.
///
/// A roster has exactly one fixed person, a non-empty rotating pool whose
/// declaration order drives the rotation, and an optional substitute who
/// covers on-site when the fixed person is unavailable.
///
/// ## Invariants
///
/// - Person ids are unique across fixed and pool members
/// - The pool is non-empty and keeps declaration order
/// - The substitute, when present, is a pool member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roster {
    fixed: Person,
    pool: Vec<Person>,
    substitute: Option<PersonId>,
}

impl Roster {
    /// Creates a validated roster.
    ///
    /// # Arguments
    ///
    /// * `fixed` - The fixed-role person
    /// * `pool` - Rotating pool members, in rotation order
    /// * `substitute` - Pool member covering for the fixed person, if any
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any person has invalid fields
    /// - The fixed person's role is not `Fixed` or a pool member's is not `Rotating`
    /// - The pool is empty
    /// - A person id appears twice
    /// - The substitute is not a pool member
    pub fn new(
        fixed: Person,
        pool: Vec<Person>,
        substitute: Option<PersonId>,
    ) -> Result<Self, DomainError> {
        validate_person_fields(&fixed)?;
        if fixed.role != Role::Fixed {
            return Err(DomainError::InvalidFixedCount { count: 0 });
        }
        if pool.is_empty() {
            return Err(DomainError::EmptyPool);
        }

        let mut seen: HashSet<&PersonId> = HashSet::new();
        seen.insert(&fixed.id);
        for member in &pool {
            validate_person_fields(member)?;
            if member.role == Role::Fixed {
                return Err(DomainError::InvalidFixedCount { count: 2 });
            }
            if !seen.insert(&member.id) {
                return Err(DomainError::DuplicatePerson(member.id.to_string()));
            }
        }

        if let Some(sub) = &substitute
            && !pool.iter().any(|p| &p.id == sub)
        {
            return Err(DomainError::SubstituteNotInPool(sub.to_string()));
        }

        Ok(Self {
            fixed,
            pool,
            substitute,
        })
    }

    /// Builds a roster from a flat member list, as found in configuration.
    ///
    /// Members with role `Fixed` must number exactly one; every other member
    /// joins the pool in list order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFixedCount` unless exactly one member is
    /// fixed, plus any error from [`Roster::new`].
    pub fn from_members(
        members: Vec<Person>,
        substitute: Option<PersonId>,
    ) -> Result<Self, DomainError> {
        let (fixed, pool): (Vec<Person>, Vec<Person>) =
            members.into_iter().partition(|p| p.role == Role::Fixed);
        let count: usize = fixed.len();
        let mut fixed_iter = fixed.into_iter();
        match (fixed_iter.next(), fixed_iter.next()) {
            (Some(fixed), None) => Self::new(fixed, pool, substitute),
            _ => Err(DomainError::InvalidFixedCount { count }),
        }
    }

    /// Returns the fixed-role person.
    #[must_use]
    pub const fn fixed(&self) -> &Person {
        &self.fixed
    }

    /// Returns the rotating pool in rotation order.
    #[must_use]
    pub fn pool(&self) -> &[Person] {
        &self.pool
    }

    /// Returns the substitute, if configured.
    #[must_use]
    pub const fn substitute(&self) -> Option<&PersonId> {
        self.substitute.as_ref()
    }

    /// Returns the index of a person in the pool.
    #[must_use]
    pub fn pool_index(&self, person_id: &PersonId) -> Option<usize> {
        self.pool.iter().position(|p| &p.id == person_id)
    }

    /// Whether the person is the fixed member or in the pool.
    #[must_use]
    pub fn is_managed(&self, person_id: &PersonId) -> bool {
        &self.fixed.id == person_id || self.pool_index(person_id).is_some()
    }

    /// Ids of every person the rotation engine owns records for.
    #[must_use]
    pub fn managed_ids(&self) -> HashSet<PersonId> {
        std::iter::once(&self.fixed)
            .chain(self.pool.iter())
            .map(|p| p.id.clone())
            .collect()
    }

    /// Every member, fixed person first, then the pool in order.
    pub fn members(&self) -> impl Iterator<Item = &Person> {
        std::iter::once(&self.fixed).chain(self.pool.iter())
    }
}
