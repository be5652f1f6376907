use serde::Serialize;

use super::refine::Candidate;

/// Final ranking: ascending road distance, unreachable entries last.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet<'a> {
    entries: Vec<Candidate<'a>>,
}

impl<'a> ResultSet<'a> {
    pub fn entries(&self) -> &[Candidate<'a>] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate<'a>> {
        self.entries.iter()
    }

    /// Entry at a 1-based rank.
    pub fn rank(&self, rank: usize) -> Option<&Candidate<'a>> {
        rank.checked_sub(1).and_then(|idx| self.entries.get(idx))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Candidate<'a>> {
        self.entries.iter().find(|c| c.unit.name == name)
    }

    pub fn reachable_count(&self) -> usize {
        self.entries.iter().filter(|c| c.is_reachable()).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'r, 'a> IntoIterator for &'r ResultSet<'a> {
    type Item = &'r Candidate<'a>;
    type IntoIter = std::slice::Iter<'r, Candidate<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Stable sort by road distance, then keep the first `n`.
///
/// Infinite distances sort after every finite one and keep their incoming
/// (geodesic) order. Never pads: fewer than `n` inputs yield fewer entries.
pub fn rank<'a>(mut refined: Vec<Candidate<'a>>, n: usize) -> ResultSet<'a> {
    refined.sort_by(|a, b| a.road_distance_m.total_cmp(&b.road_distance_m));
    refined.truncate(n);
    ResultSet { entries: refined }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::dataset::PollingUnit;
    use crate::sdk::query::GeoPoint;

    fn units(n: usize) -> Vec<PollingUnit> {
        (0..n)
            .map(|id| PollingUnit {
                id,
                name: format!("PU {id}"),
                ward: String::new(),
                lga: String::new(),
                state: String::new(),
                location: GeoPoint::new(0.0, 0.0),
            })
            .collect()
    }

    fn candidate(unit: &PollingUnit, road: f64) -> Candidate<'_> {
        Candidate {
            unit,
            geodesic_distance_m: unit.id as f64,
            road_distance_m: road,
            road_duration_s: road / 10.0,
            route: None,
        }
    }

    fn ids(set: &ResultSet<'_>) -> Vec<usize> {
        set.iter().map(|c| c.unit.id).collect()
    }

    #[test]
    fn sorts_by_road_distance() {
        let us = units(4);
        let refined = vec![
            candidate(&us[0], 900.0),
            candidate(&us[1], 300.0),
            candidate(&us[2], 600.0),
            candidate(&us[3], 100.0),
        ];
        assert_eq!(ids(&rank(refined, 10)), vec![3, 1, 2, 0]);
    }

    #[test]
    fn unreachable_entries_trail_in_input_order() {
        let us = units(5);
        let refined = vec![
            candidate(&us[0], f64::INFINITY),
            candidate(&us[1], 500.0),
            candidate(&us[2], f64::INFINITY),
            candidate(&us[3], 200.0),
            candidate(&us[4], f64::INFINITY),
        ];
        let set = rank(refined, 5);
        assert_eq!(ids(&set), vec![3, 1, 0, 2, 4]);
        assert_eq!(set.reachable_count(), 2);

        let first_inf = set.iter().position(|c| !c.is_reachable()).unwrap();
        assert!(set.entries()[first_inf..].iter().all(|c| !c.is_reachable()));
        for pair in set.entries().windows(2) {
            assert!(pair[0].road_distance_m <= pair[1].road_distance_m);
        }
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let us = units(3);
        let refined = vec![
            candidate(&us[0], 400.0),
            candidate(&us[1], 400.0),
            candidate(&us[2], 100.0),
        ];
        assert_eq!(ids(&rank(refined, 3)), vec![2, 0, 1]);
    }

    #[test]
    fn truncates_to_min_of_n_and_len() {
        let us = units(6);
        for n in 1..=8 {
            let refined = us.iter().map(|u| candidate(u, 1000.0 - u.id as f64)).collect();
            assert_eq!(rank(refined, n).len(), n.min(6));
        }
    }

    #[test]
    fn empty_input_is_empty_result() {
        let set = rank(Vec::new(), 5);
        assert!(set.is_empty());
        assert!(set.rank(1).is_none());
    }

    #[test]
    fn lookup_by_rank_and_name() {
        let us = units(3);
        let refined = vec![candidate(&us[0], 30.0), candidate(&us[1], 10.0), candidate(&us[2], 20.0)];
        let set = rank(refined, 3);
        assert_eq!(set.rank(1).unwrap().unit.id, 1);
        assert_eq!(set.rank(3).unwrap().unit.id, 0);
        assert!(set.rank(0).is_none());
        assert!(set.rank(4).is_none());
        assert_eq!(set.find_by_name("PU 2").unwrap().road_distance_m, 20.0);
        assert!(set.find_by_name("PU 9").is_none());
    }
}
