use anyhow::{bail, ensure, Result};

use crate::skiplist::SkipList;

impl<K: Ord, V, G, const LEVELS: usize> SkipList<K, V, G, LEVELS> {
    /// Walks every level and checks the structure is consistent:
    ///
    /// - the base level holds each live node exactly once, in key order;
    /// - every express level is a subsequence of the base level;
    /// - a node of height `h` is linked into levels `0..h` and no others;
    /// - the sentinel closes every chain and spans all levels.
    ///
    /// Costs O(n * LEVELS); meant for tests and debugging.
    pub fn validate(&self) -> Result<()> {
        let nodes = self.nodes();
        let head = nodes.head();
        ensure!(
            head.height == LEVELS,
            "sentinel spans {} of {} levels",
            head.height,
            LEVELS
        );

        let mut position = vec![None; nodes.capacity_used() + 1];
        let mut members = [0usize; LEVELS];
        let mut walked = 0;
        let mut prev: Option<&K> = None;
        let mut cursor = head.next;
        while !cursor.is_sentinel() {
            let Some(node) = nodes.get(cursor) else {
                bail!("base level links to stale node {:?}", cursor);
            };
            ensure!(
                position[cursor.index].is_none(),
                "node {:?} appears twice on the base level",
                cursor
            );
            if let Some(prev) = prev {
                ensure!(prev <= &node.key, "base level out of order at {:?}", cursor);
            }
            let height = node.links.height;
            ensure!(height <= LEVELS, "node {:?} is {} levels tall", cursor, height);
            ensure!(
                node.links.next_jump[height..].iter().all(|id| id.is_sentinel()),
                "node {:?} has links above its height",
                cursor
            );

            position[cursor.index] = Some(walked);
            for count in &mut members[..height] {
                *count += 1;
            }
            walked += 1;
            prev = Some(&node.key);
            cursor = node.links.next;
        }
        ensure!(
            walked == nodes.len(),
            "base level holds {} of {} nodes",
            walked,
            nodes.len()
        );

        for (level, &expected) in members.iter().enumerate() {
            let mut last = None;
            let mut seen = 0;
            let mut cursor = head.next_jump[level];
            while !cursor.is_sentinel() {
                let Some(node) = nodes.get(cursor) else {
                    bail!("level {} links to stale node {:?}", level, cursor);
                };
                let Some(at) = position[cursor.index] else {
                    bail!("level {} links to {:?}, which is off the base level", level, cursor);
                };
                ensure!(
                    node.links.height > level,
                    "level {} links to {:?} above its height",
                    level,
                    cursor
                );
                if let Some(last) = last {
                    ensure!(last < at, "level {} out of base order at {:?}", level, cursor);
                }
                last = Some(at);
                seen += 1;
                cursor = node.links.next_jump[level];
            }
            ensure!(
                seen == expected,
                "level {} links {} of {} member nodes",
                level,
                seen,
                expected
            );
        }
        Ok(())
    }
}
