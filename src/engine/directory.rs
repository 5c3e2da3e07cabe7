use crate::entities::Club;
use crate::store::{Collection, RecordStore};

pub const UNKNOWN_CLUB: &str = "Unknown Club";

/// Resolves club ids to display names over a snapshot of the Club collection.
#[derive(Clone, Debug, Default)]
pub struct ClubDirectory {
    clubs: Vec<Club>,
}

impl ClubDirectory {
    pub fn new(clubs: Vec<Club>) -> Self {
        Self { clubs }
    }

    pub async fn load(store: &RecordStore) -> Self {
        Self::new(store.load(Collection::Clubs).await)
    }

    pub fn find(&self, club_id: &str) -> Option<&Club> {
        self.clubs.iter().find(|club| club.id == club_id)
    }

    pub fn name_of(&self, club_id: &str) -> String {
        self.find(club_id)
            .map(|club| club.name.clone())
            .unwrap_or_else(|| UNKNOWN_CLUB.to_string())
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }
}

#[test]
fn unknown_ids_resolve_to_placeholder() {
    let directory = ClubDirectory::new(vec![Club {
        id: "c1".into(),
        name: "Chess".into(),
        ..Default::default()
    }]);

    assert_eq!(directory.name_of("c1"), "Chess");
    assert_eq!(directory.name_of("c2"), UNKNOWN_CLUB);
    assert_eq!(directory.name_of(""), UNKNOWN_CLUB);
    assert_eq!(ClubDirectory::default().name_of("c1"), UNKNOWN_CLUB);
}
