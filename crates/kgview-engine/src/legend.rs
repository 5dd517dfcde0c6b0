//! Legend entries and community summaries, derived from the same retained
//! community set the meta-graph uses.

use std::collections::BTreeMap;

use crate::community::OTHER_COMMUNITY_ID;
use crate::context::ViewContext;
use crate::types::{LegendItem, SummaryView};

pub fn build_legend(ctx: &ViewContext<'_>) -> Vec<LegendItem> {
    let config = ctx.config;
    let mut legend: Vec<LegendItem> = ctx
        .buckets
        .retained_ids()
        .map(|id| LegendItem {
            id,
            color: config.color_for(id).to_string(),
            count: ctx.buckets.members(id).len(),
            members: ctx
                .buckets
                .ranked_members(id, &ctx.snapshot.entities)
                .into_iter()
                .take(config.top_members)
                .map(str::to_string)
                .collect(),
            title: ctx
                .snapshot
                .summaries
                .get(&id)
                .map(|s| s.display_title())
                .unwrap_or_else(|| format!("Community {}", id)),
        })
        .collect();

    if ctx.buckets.has_other() {
        let other = &ctx.buckets.other;
        legend.push(LegendItem {
            id: OTHER_COMMUNITY_ID,
            color: config.other_color.clone(),
            count: other.members,
            members: Vec::new(),
            title: format!("Other ({} small communities)", other.communities),
        });
    }

    legend
}

/// Summaries of qualifying communities only.
pub fn summarize_communities(ctx: &ViewContext<'_>) -> BTreeMap<i64, SummaryView> {
    ctx.buckets
        .retained_ids()
        .filter_map(|id| {
            ctx.snapshot.summaries.get(&id).map(|s| {
                (
                    id,
                    SummaryView {
                        title: s.display_title(),
                        summary: s.summary().to_string(),
                        key_insights: s.key_insights.clone(),
                    },
                )
            })
        })
        .collect()
}
