//! Region/interval algebra: subtracting guarded sections from candidate edit regions.
//!
//! A formatting request names the regions it wants rewritten (or defaults to the whole
//! document). The host document may protect byte ranges from modification (generated-code
//! markers, injected sections); those guarded sections are subtracted here, producing the
//! disjoint, ordered set of regions the formatter backend is actually allowed to touch.
//!
//! All bounds in this module are **inclusive** character offsets.

use crate::document::Document;
use thiserror::Error;

/// A span of the document eligible for reformatting, with inclusive bounds.
///
/// Ephemeral: created per formatting request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Inclusive start offset.
    pub start: usize,
    /// Inclusive end offset, `start <= end`.
    pub end: usize,
}

impl Region {
    /// Create a region over the inclusive offsets `start..=end`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`; an empty span has no inclusive-bounds representation.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "region start {start} > end {end}");
        Self { start, end }
    }

    /// Length of the region in characters.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Check if the region contains an offset.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// A read-only span the host document protects from modification, with inclusive bounds.
///
/// The engine never creates or destroys guarded sections; it only queries them for the duration
/// of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardedSection {
    /// Inclusive start offset.
    pub start: usize,
    /// Inclusive end offset, `start <= end`.
    pub end: usize,
}

impl GuardedSection {
    /// Create a guarded section over the inclusive offsets `start..=end`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "guarded section start {start} > end {end}");
        Self { start, end }
    }

    /// Check if the section contains an offset.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Source of the guarded sections for a document.
///
/// Queried once per formatting request; the returned list is treated as a momentary snapshot.
pub trait GuardedSectionProvider {
    /// The guarded sections currently active for `document` (possibly empty, any order).
    fn guarded_sections(&self, document: &Document) -> Vec<GuardedSection>;
}

/// A provider for hosts without guarded sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGuards;

impl GuardedSectionProvider for NoGuards {
    fn guarded_sections(&self, _document: &Document) -> Vec<GuardedSection> {
        Vec::new()
    }
}

/// Error produced when constructing a [`ChangeSet`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChangeSetError {
    /// Two supplied regions overlap; regions may touch but not share offsets.
    #[error("regions {first} and {second} overlap")]
    OverlappingRegions {
        /// The earlier region (by start offset).
        first: Region,
        /// The later, overlapping region.
        second: Region,
    },
}

/// An ordered set of disjoint regions, sorted ascending by start offset.
///
/// Built fresh per formatting request from explicit edit regions; adjacent regions may touch but
/// must not overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    regions: Vec<Region>,
}

impl ChangeSet {
    /// Build a change set from the given regions, sorting them by start offset.
    pub fn new(mut regions: Vec<Region>) -> Result<Self, ChangeSetError> {
        regions.sort_by_key(|r| (r.start, r.end));
        for pair in regions.windows(2) {
            if pair[1].start <= pair[0].end {
                return Err(ChangeSetError::OverlappingRegions {
                    first: pair[0],
                    second: pair[1],
                });
            }
        }
        Ok(Self { regions })
    }

    /// A change set covering all of a document of `doc_len` characters.
    ///
    /// An empty document yields an empty change set.
    pub fn whole_document(doc_len: usize) -> Self {
        let regions = if doc_len == 0 {
            Vec::new()
        } else {
            vec![Region::new(0, doc_len - 1)]
        };
        Self { regions }
    }

    /// The regions, ascending by start offset.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Returns `true` if the change set contains no regions.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Subtract guarded sections from one candidate region.
///
/// Returns zero or more disjoint sub-regions of `region`, each with empty intersection with
/// every guarded section. Sections are sorted by start offset before the walk, so callers may
/// supply them in any order.
pub fn clip(region: Region, guarded: &[GuardedSection]) -> Vec<Region> {
    let mut sorted = guarded.to_vec();
    sorted.sort_by_key(|g| (g.start, g.end));

    let mut out = Vec::new();
    let mut start = region.start;
    let mut end = region.end;

    for guard in &sorted {
        if guard.contains(start) {
            if end > guard.end {
                // Clip the front, skip past the guard.
                start = guard.end + 1;
            } else {
                // Remaining cursor entirely swallowed by the guard.
                return out;
            }
        } else if guard.contains(end) {
            if start < guard.start {
                // Clip the tail.
                end = guard.start - 1;
            } else {
                return out;
            }
        } else if start < guard.start && end > guard.end {
            // Guard strictly interior: split the cursor.
            out.push(Region::new(start, guard.start - 1));
            start = guard.end + 1;
        }
        // No overlap: continue with the next guard unchanged.
    }

    out.push(Region::new(start, end));
    out
}

/// Compute the formattable regions for a request.
///
/// Each region of `changes` (defaulting to the whole document when `None`) is clipped against
/// the guarded sections; the concatenated result stays disjoint and ordered. An empty result is
/// a successful no-op signal, not an error.
pub fn formattable_regions(
    changes: Option<&ChangeSet>,
    guarded: &[GuardedSection],
    doc_len: usize,
) -> Vec<Region> {
    let default;
    let changes = match changes {
        Some(set) => set,
        None => {
            default = ChangeSet::whole_document(doc_len);
            &default
        }
    };

    changes
        .regions()
        .iter()
        .flat_map(|region| clip(*region, guarded))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_contains() {
        let region = Region::new(10, 20);
        assert!(region.contains(10));
        assert!(region.contains(20));
        assert!(!region.contains(9));
        assert!(!region.contains(21));
        assert_eq!(region.len(), 11);
    }

    #[test]
    fn test_clip_no_guards() {
        assert_eq!(
            clip(Region::new(5, 40), &[]),
            vec![Region::new(5, 40)]
        );
    }

    #[test]
    fn test_clip_full_containment() {
        // Region fully inside one guard: empty result.
        assert_eq!(clip(Region::new(10, 20), &[GuardedSection::new(0, 100)]), vec![]);
    }

    #[test]
    fn test_clip_full_coverage_split() {
        // Region fully containing one guard: two output regions.
        assert_eq!(
            clip(Region::new(0, 100), &[GuardedSection::new(40, 60)]),
            vec![Region::new(0, 39), Region::new(61, 100)]
        );
    }

    #[test]
    fn test_clip_boundary_touch_no_split() {
        // Region touching a guard boundary exactly: no false split.
        assert_eq!(
            clip(Region::new(0, 50), &[GuardedSection::new(51, 60)]),
            vec![Region::new(0, 50)]
        );
        assert_eq!(
            clip(Region::new(61, 80), &[GuardedSection::new(51, 60)]),
            vec![Region::new(61, 80)]
        );
    }

    #[test]
    fn test_clip_front_and_tail() {
        // Cursor start inside guard, end beyond: front clipped.
        assert_eq!(
            clip(Region::new(10, 50), &[GuardedSection::new(5, 20)]),
            vec![Region::new(21, 50)]
        );
        // Cursor end inside guard, start before: tail clipped.
        assert_eq!(
            clip(Region::new(10, 50), &[GuardedSection::new(40, 60)]),
            vec![Region::new(10, 39)]
        );
    }

    #[test]
    fn test_clip_multiple_guards_unsorted() {
        // Guards supplied out of order still clip left-to-right.
        let guards = [GuardedSection::new(60, 70), GuardedSection::new(20, 30)];
        assert_eq!(
            clip(Region::new(0, 100), &guards),
            vec![Region::new(0, 19), Region::new(31, 59), Region::new(71, 100)]
        );
    }

    #[test]
    fn test_clip_swallowed_after_split() {
        // After splitting around the first guard, the remainder is swallowed by the second.
        let guards = [GuardedSection::new(10, 20), GuardedSection::new(21, 100)];
        assert_eq!(
            clip(Region::new(0, 80), &guards),
            vec![Region::new(0, 9)]
        );
    }

    #[test]
    fn test_changeset_sorts_and_rejects_overlap() {
        let set = ChangeSet::new(vec![Region::new(30, 40), Region::new(0, 10)]).unwrap();
        assert_eq!(set.regions(), &[Region::new(0, 10), Region::new(30, 40)]);

        // Touching is allowed.
        assert!(ChangeSet::new(vec![Region::new(0, 10), Region::new(11, 20)]).is_ok());

        // Sharing an offset is not.
        let err = ChangeSet::new(vec![Region::new(0, 10), Region::new(10, 20)]).unwrap_err();
        assert_eq!(
            err,
            ChangeSetError::OverlappingRegions {
                first: Region::new(0, 10),
                second: Region::new(10, 20),
            }
        );
    }

    #[test]
    fn test_formattable_regions_default_whole_document() {
        // No changed regions supplied: default to a single region covering the document.
        assert_eq!(
            formattable_regions(None, &[], 42),
            vec![Region::new(0, 41)]
        );
        assert_eq!(formattable_regions(None, &[], 0), vec![]);
    }

    #[test]
    fn test_formattable_regions_guarded_scenario() {
        // Document of length 50, changed region [0,49], guard [20,30]:
        // exactly two formattable regions.
        let changes = ChangeSet::new(vec![Region::new(0, 49)]).unwrap();
        let guards = [GuardedSection::new(20, 30)];
        assert_eq!(
            formattable_regions(Some(&changes), &guards, 50),
            vec![Region::new(0, 19), Region::new(31, 49)]
        );
    }

    #[test]
    fn test_formattable_regions_all_guarded() {
        let changes = ChangeSet::new(vec![Region::new(5, 15)]).unwrap();
        let guards = [GuardedSection::new(0, 20)];
        assert_eq!(formattable_regions(Some(&changes), &guards, 30), vec![]);
    }
}
