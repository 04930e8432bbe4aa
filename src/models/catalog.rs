//! In-memory dictionary of the reference tables.
//!
//! Reference data is small and changes only with ingestion, so queries load
//! it once and resolve associations from here instead of issuing a lookup
//! per row.

use serde::{Deserialize, Serialize};

use super::{
    Bracket, BracketId, Faction, FactionId, Gender, GenderId, Race, RaceId, Realm, RealmId,
    Region, RegionId, Role, RoleId, Season, SeasonId, Spec, SpecId, Term, TermId,
};

/// All reference tables, each sorted by ascending id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub brackets: Vec<Bracket>,
    pub regions: Vec<Region>,
    pub seasons: Vec<Season>,
    pub terms: Vec<Term>,
    pub roles: Vec<Role>,
    pub specs: Vec<Spec>,
    pub races: Vec<Race>,
    pub realms: Vec<Realm>,
    pub genders: Vec<Gender>,
    pub factions: Vec<Faction>,
}

impl Catalog {
    /// Sort every table by id so callers can rely on ascending order.
    pub fn normalized(mut self) -> Self {
        self.brackets.sort_by_key(|b| b.id);
        self.regions.sort_by_key(|r| r.id);
        self.seasons.sort_by_key(|s| s.id);
        self.terms.sort_by_key(|t| t.id);
        self.roles.sort_by_key(|r| r.id);
        self.specs.sort_by_key(|s| s.id);
        self.races.sort_by_key(|r| r.id);
        self.realms.sort_by_key(|r| r.id);
        self.genders.sort_by_key(|g| g.id);
        self.factions.sort_by_key(|f| f.id);
        self
    }

    pub fn bracket(&self, id: BracketId) -> Option<&Bracket> {
        self.brackets.iter().find(|b| b.id == id)
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn season(&self, id: SeasonId) -> Option<&Season> {
        self.seasons.iter().find(|s| s.id == id)
    }

    pub fn term(&self, id: TermId) -> Option<&Term> {
        self.terms.iter().find(|t| t.id == id)
    }

    pub fn role(&self, id: RoleId) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn spec(&self, id: SpecId) -> Option<&Spec> {
        self.specs.iter().find(|s| s.id == id)
    }

    pub fn race(&self, id: RaceId) -> Option<&Race> {
        self.races.iter().find(|r| r.id == id)
    }

    pub fn realm(&self, id: RealmId) -> Option<&Realm> {
        self.realms.iter().find(|r| r.id == id)
    }

    pub fn gender(&self, id: GenderId) -> Option<&Gender> {
        self.genders.iter().find(|g| g.id == id)
    }

    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.iter().find(|f| f.id == id)
    }

    /// Ids of every spec belonging to `role`, ascending.
    pub fn role_spec_ids(&self, role: RoleId) -> Vec<SpecId> {
        self.specs
            .iter()
            .filter(|s| s.role_id == role)
            .map(|s| s.id)
            .collect()
    }

    /// Terms of a season, ascending by id.
    pub fn season_terms(&self, season: SeasonId) -> Vec<&Term> {
        self.terms.iter().filter(|t| t.season_id == season).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: u32, role: u32) -> Spec {
        Spec {
            id: SpecId(id),
            role_id: RoleId(role),
            name: format!("spec-{}", id),
        }
    }

    #[test]
    fn test_role_spec_ids() {
        let catalog = Catalog {
            specs: vec![spec(5, 2), spec(1, 1), spec(3, 2), spec(2, 1)],
            ..Default::default()
        }
        .normalized();

        assert_eq!(catalog.role_spec_ids(RoleId(2)), vec![SpecId(3), SpecId(5)]);
        assert_eq!(catalog.role_spec_ids(RoleId(1)), vec![SpecId(1), SpecId(2)]);
        assert!(catalog.role_spec_ids(RoleId(9)).is_empty());
    }

    #[test]
    fn test_normalized_sorts_roles() {
        let catalog = Catalog {
            roles: vec![
                Role {
                    id: RoleId(3),
                    name: "Mage".to_string(),
                },
                Role {
                    id: RoleId(1),
                    name: "Warrior".to_string(),
                },
            ],
            ..Default::default()
        }
        .normalized();

        assert_eq!(catalog.roles[0].id, RoleId(1));
        assert_eq!(catalog.role(RoleId(3)).map(|r| r.name.as_str()), Some("Mage"));
        assert!(catalog.role(RoleId(2)).is_none());
    }
}
