//! Community bucketing: qualifying communities and the folded "other" bucket.

use std::collections::BTreeMap;

use kgview_store::{CommunitySummary, Entity};

use crate::connectivity::VisibleSet;

/// Meta id of the synthetic bucket holding every folded entity.
pub const OTHER_META_ID: &str = "comm-other";

/// Community id reported for the folded bucket.
pub const OTHER_COMMUNITY_ID: i64 = -1;

/// Meta id of a qualifying community.
pub fn community_meta_id(community_id: i64) -> String {
    format!("comm-{}", community_id)
}

/// Aggregate of every visible entity that did not land in a qualifying community.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtherBucket {
    /// Distinct non-qualifying buckets that had at least one visible member.
    pub communities: usize,
    /// Visible entities folded into the bucket.
    pub members: usize,
}

/// Visible entities partitioned by community.
#[derive(Debug, Clone, Default)]
pub struct CommunityBuckets {
    /// Qualifying community id → visible member names, ascending.
    retained: BTreeMap<i64, Vec<String>>,
    pub other: OtherBucket,
}

impl CommunityBuckets {
    /// Partition `visible` by community.
    ///
    /// A community qualifies when it is assigned, has a summary, and has at
    /// least `min_size` visible members. Every other non-empty bucket is folded.
    pub fn aggregate(
        visible: &VisibleSet,
        entities: &BTreeMap<String, Entity>,
        summaries: &BTreeMap<i64, CommunitySummary>,
        min_size: usize,
    ) -> Self {
        let mut members: BTreeMap<Option<i64>, Vec<String>> = BTreeMap::new();
        for name in visible.iter() {
            let community = entities.get(name).and_then(|e| e.community);
            members.entry(community).or_default().push(name.clone());
        }

        let mut retained = BTreeMap::new();
        let mut other = OtherBucket::default();

        for (community, names) in members {
            match community {
                Some(id) if names.len() >= min_size && summaries.contains_key(&id) => {
                    retained.insert(id, names);
                }
                _ => {
                    other.communities += 1;
                    other.members += names.len();
                }
            }
        }

        Self { retained, other }
    }

    /// Whether `community_id` is shown as its own meta-node.
    pub fn is_retained(&self, community_id: i64) -> bool {
        self.retained.contains_key(&community_id)
    }

    /// Qualifying community ids, ascending.
    pub fn retained_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.retained.keys().copied()
    }

    /// Visible members of a qualifying community, ascending by name.
    pub fn members(&self, community_id: i64) -> &[String] {
        self.retained
            .get(&community_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Member counts of the qualifying communities only (the size-scaling domain).
    pub fn qualifying_counts(&self) -> Vec<f64> {
        self.retained.values().map(|m| m.len() as f64).collect()
    }

    /// Meta id an entity's community maps to, if it maps to a displayed node.
    pub fn meta_id_for(&self, community: Option<i64>) -> String {
        match community {
            Some(id) if self.is_retained(id) => community_meta_id(id),
            _ => OTHER_META_ID.to_string(),
        }
    }

    pub fn has_other(&self) -> bool {
        self.other.members > 0
    }

    pub fn retained_len(&self) -> usize {
        self.retained.len()
    }

    /// Members of a qualifying community ordered by descending PageRank.
    /// Ties keep ascending name order.
    pub fn ranked_members<'a>(
        &'a self,
        community_id: i64,
        entities: &BTreeMap<String, Entity>,
    ) -> Vec<&'a str> {
        let mut ranked: Vec<(&str, f64)> = self
            .members(community_id)
            .iter()
            .map(|name| {
                let pagerank = entities.get(name).map(Entity::pagerank).unwrap_or(0.0);
                (name.as_str(), pagerank)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.into_iter().map(|(name, _)| name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::RelationGraph;
    use kgview_store::Relationship;

    fn entity(name: &str, community: Option<i64>, pagerank: f64) -> Entity {
        Entity {
            community,
            pagerank: Some(pagerank),
            ..Entity::new(name)
        }
    }

    fn summary(id: i64) -> (i64, CommunitySummary) {
        (
            id,
            CommunitySummary {
                community_id: id,
                title: Some(format!("Community title {}", id)),
                ..Default::default()
            },
        )
    }

    fn fixture() -> (BTreeMap<String, Entity>, VisibleSet) {
        let ents: BTreeMap<String, Entity> = [
            entity("A", Some(0), 0.5),
            entity("B", Some(0), 0.8),
            entity("C", Some(0), 0.1),
            entity("D", Some(1), 0.3),
            entity("E", Some(2), 0.2),
            entity("F", Some(2), 0.2),
            entity("G", None, 0.9),
        ]
        .into_iter()
        .map(|e| (e.name.clone(), e))
        .collect();
        let rels = vec![
            Relationship::new("A", "B"),
            Relationship::new("C", "D"),
            Relationship::new("E", "F"),
            Relationship::new("G", "A"),
        ];
        let graph = RelationGraph::build(&ents, &rels);
        let visible = VisibleSet::select(&ents, &graph, false);
        (ents, visible)
    }

    #[test]
    fn test_threshold_and_folding() {
        let (ents, visible) = fixture();
        let summaries: BTreeMap<_, _> = [summary(0), summary(1)].into_iter().collect();
        let buckets = CommunityBuckets::aggregate(&visible, &ents, &summaries, 2);

        assert!(buckets.is_retained(0));
        // Below threshold.
        assert!(!buckets.is_retained(1));
        // Large enough but no summary.
        assert!(!buckets.is_retained(2));

        assert_eq!(buckets.members(0), ["A", "B", "C"]);
        // Community 1, community 2 and the unassigned bucket.
        assert_eq!(buckets.other.communities, 3);
        assert_eq!(buckets.other.members, 4);
        assert!(buckets.has_other());
    }

    #[test]
    fn test_partition_accounts_every_visible_node_once() {
        let (ents, visible) = fixture();
        let summaries: BTreeMap<_, _> = [summary(0), summary(1), summary(2)].into_iter().collect();
        let buckets = CommunityBuckets::aggregate(&visible, &ents, &summaries, 2);

        let retained: usize = buckets.retained_ids().map(|id| buckets.members(id).len()).sum();
        assert_eq!(retained + buckets.other.members, visible.len());
    }

    #[test]
    fn test_meta_ids() {
        let (ents, visible) = fixture();
        let summaries: BTreeMap<_, _> = [summary(0)].into_iter().collect();
        let buckets = CommunityBuckets::aggregate(&visible, &ents, &summaries, 2);

        assert_eq!(buckets.meta_id_for(Some(0)), "comm-0");
        assert_eq!(buckets.meta_id_for(Some(1)), OTHER_META_ID);
        assert_eq!(buckets.meta_id_for(None), OTHER_META_ID);
        assert_eq!(buckets.qualifying_counts(), vec![3.0]);
    }

    #[test]
    fn test_ranked_members() {
        let (ents, visible) = fixture();
        let summaries: BTreeMap<_, _> = [summary(0)].into_iter().collect();
        let buckets = CommunityBuckets::aggregate(&visible, &ents, &summaries, 2);
        assert_eq!(buckets.ranked_members(0, &ents), vec!["B", "A", "C"]);
        assert!(buckets.ranked_members(7, &ents).is_empty());
    }

    #[test]
    fn test_min_size_one_keeps_singletons() {
        let (ents, visible) = fixture();
        let summaries: BTreeMap<_, _> = [summary(0), summary(1)].into_iter().collect();
        let buckets = CommunityBuckets::aggregate(&visible, &ents, &summaries, 1);
        assert!(buckets.is_retained(1));
        assert_eq!(buckets.retained_len(), 2);
    }

    #[test]
    fn test_no_visible_nodes() {
        let buckets = CommunityBuckets::aggregate(
            &VisibleSet::default(),
            &BTreeMap::new(),
            &BTreeMap::new(),
            2,
        );
        assert_eq!(buckets.retained_len(), 0);
        assert!(!buckets.has_other());
    }
}
