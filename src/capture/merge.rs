//! merging per-theme snapshots into one record per resource
use {
    crate::{
        error::{Result, TcError},
        models::{MergeStrategy, MergedRecord, Snapshot, SourceCategory, ThemeColors},
    },
    hashbrown::{HashMap, HashSet},
    tracing::{debug, warn},
};

/// merge the snapshots of one source, using the strategy that's safe for it
///
/// # Arguments
///
/// * `source` - the source every snapshot belongs to
/// * `snapshots` - one snapshot per theme, in theme order
///
/// # Errors
///
/// see [`merge_with`]
pub fn merge(source: SourceCategory, snapshots: &[Snapshot]) -> Result<Vec<MergedRecord>> {
    merge_with(source.merge_strategy(), source, snapshots)
}

/// merge the snapshots of one source with an explicit strategy
///
/// records come out in order of first appearance, starting with the first snapshot
///
/// # Errors
///
/// returns [`TcError::MixedSources`] if a snapshot belongs to another source
/// returns [`TcError::DuplicateTheme`] if two snapshots share a theme
/// returns [`TcError::MergeArityMismatch`] if positional snapshots differ in length
/// returns [`TcError::MergeMisaligned`] if positional snapshots disagree on an identity
/// returns [`TcError::MergeDuplicate`] if a positional snapshot lists an identity twice
pub fn merge_with(
    strategy: MergeStrategy,
    source: SourceCategory,
    snapshots: &[Snapshot],
) -> Result<Vec<MergedRecord>> {
    let mut themes = HashSet::with_capacity(snapshots.len());

    for snapshot in snapshots {
        if snapshot.source() != source {
            return Err(TcError::MixedSources {
                expected: source,
                found: snapshot.source(),
            });
        }

        if !themes.insert(snapshot.theme()) {
            return Err(TcError::DuplicateTheme(snapshot.theme().clone()));
        }
    }

    let records = match strategy {
        MergeStrategy::Positional => merge_positional(source, snapshots)?,
        MergeStrategy::Keyed => merge_keyed(snapshots),
    };

    debug!(%source, ?strategy, records = records.len(), "Merged snapshots");
    Ok(records)
}

/// the i-th entry of every snapshot is the same resource
fn merge_positional(
    source: SourceCategory,
    snapshots: &[Snapshot],
) -> Result<Vec<MergedRecord>> {
    let Some(first) = snapshots.first() else {
        return Ok(Vec::new());
    };

    let mut seen = HashSet::with_capacity(first.len());

    for (index, entry) in first.entries().iter().enumerate() {
        let identity = entry.descriptor.identity();

        if !seen.insert(identity) {
            return Err(TcError::MergeDuplicate {
                category: source,
                identity: identity.to_string(),
                index,
            });
        }
    }

    if let Some(off) = snapshots.iter().find(|s| s.len() != first.len()) {
        return Err(TcError::MergeArityMismatch {
            category: source,
            theme: off.theme().clone(),
            expected: first.len(),
            found: off.len(),
        });
    }

    let mut records: Vec<MergedRecord> = first
        .entries()
        .iter()
        .map(|entry| {
            MergedRecord::from_descriptor(
                &entry.descriptor,
                ThemeColors::with_capacity(snapshots.len()),
            )
        })
        .collect();

    for snapshot in snapshots {
        for (index, (record, entry)) in records.iter_mut().zip(snapshot.entries()).enumerate() {
            if entry.descriptor.identity() != record.identity {
                return Err(TcError::MergeMisaligned {
                    category: source,
                    index,
                    expected: record.identity.clone(),
                    found: entry.descriptor.identity().to_string(),
                });
            }

            record.colors.insert(snapshot.theme().clone(), entry.color);
        }
    }

    Ok(records)
}

/// entries are matched up by identity, a record only has the themes it resolved under
fn merge_keyed(snapshots: &[Snapshot]) -> Vec<MergedRecord> {
    let mut records: Vec<MergedRecord> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for snapshot in snapshots {
        for entry in snapshot.entries() {
            let identity = entry.descriptor.identity();

            match index.get(identity) {
                Some(&i) => {
                    if !records[i].colors.insert(snapshot.theme().clone(), entry.color) {
                        warn!(
                            theme = %snapshot.theme(),
                            identity,
                            "Duplicate identity in snapshot, keeping the first"
                        );
                    }
                }
                None => {
                    let mut colors = ThemeColors::with_capacity(snapshots.len());
                    colors.insert(snapshot.theme().clone(), entry.color);

                    index.insert(identity, records.len());
                    records.push(MergedRecord::from_descriptor(&entry.descriptor, colors));
                }
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            color::ColorValue,
            models::{ResourceDescriptor, ResourceKey, SnapshotEntry, ThemeName},
        },
    };

    fn gray(v: u8) -> ColorValue {
        ColorValue::new(255, v, v, v)
    }

    fn env(token: &str) -> ResourceDescriptor {
        ResourceDescriptor::keyed(
            SourceCategory::EnvironmentColor,
            token,
            ResourceKey::new(token).with_key_type("Background"),
        )
    }

    fn brush(name: &str) -> ResourceDescriptor {
        ResourceDescriptor::named(SourceCategory::Brush, name)
    }

    fn snapshot(
        theme: &str,
        source: SourceCategory,
        entries: &[(ResourceDescriptor, u8)],
    ) -> Snapshot {
        Snapshot::new(
            ThemeName::from(theme),
            source,
            entries
                .iter()
                .map(|(descriptor, v)| SnapshotEntry {
                    descriptor: descriptor.clone(),
                    color: gray(*v),
                })
                .collect(),
        )
    }

    #[test]
    fn test_positional_lines_up_by_index() {
        let (a, b, c) = (env("a"), env("b"), env("c"));
        let source = SourceCategory::EnvironmentColor;
        let snapshots = [
            snapshot("light", source, &[(a.clone(), 1), (b.clone(), 2), (c.clone(), 3)]),
            snapshot("dark", source, &[(a.clone(), 4), (b.clone(), 5), (c.clone(), 6)]),
            snapshot("blue", source, &[(a, 7), (b, 8), (c, 9)]),
        ];

        let records = merge(source, &snapshots).unwrap();
        assert_eq!(records.len(), 3);

        let second = &records[1];
        assert_eq!(second.identity, "b");
        assert_eq!(second.key_type.as_deref(), Some("Background"));
        assert_eq!(
            second.colors.iter().collect::<Vec<_>>(),
            vec![
                (&ThemeName::from("light"), gray(2)),
                (&ThemeName::from("dark"), gray(5)),
                (&ThemeName::from("blue"), gray(8)),
            ]
        );

        for record in &records {
            assert_eq!(record.colors.len(), 3);
        }
    }

    #[test]
    fn test_positional_length_mismatch_is_fatal() {
        let source = SourceCategory::RawColor;
        let raw = |t: &str| ResourceDescriptor::keyed(source, t, ResourceKey::new(t));
        let snapshots = [
            snapshot("light", source, &[(raw("a"), 1), (raw("b"), 2)]),
            snapshot("dark", source, &[(raw("a"), 3)]),
        ];

        let err = merge(source, &snapshots).unwrap_err();
        assert!(matches!(
            err,
            TcError::MergeArityMismatch {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_positional_identity_check() {
        let source = SourceCategory::EnvironmentColor;
        let snapshots = [
            snapshot("light", source, &[(env("a"), 1), (env("b"), 2)]),
            snapshot("dark", source, &[(env("b"), 3), (env("a"), 4)]),
        ];

        let err = merge(source, &snapshots).unwrap_err();
        assert!(matches!(err, TcError::MergeMisaligned { index: 0, .. }));
    }

    #[test]
    fn test_positional_repeated_identity_is_fatal() {
        let a = env("Env.A");
        let source = SourceCategory::EnvironmentColor;
        let snapshots = [
            snapshot("light", source, &[(a.clone(), 1), (a.clone(), 2)]),
            snapshot("dark", source, &[(a.clone(), 3), (a, 4)]),
        ];

        let err = merge(source, &snapshots).unwrap_err();
        assert!(matches!(
            err,
            TcError::MergeDuplicate { ref identity, index: 1, .. } if identity == "Env.A"
        ));
    }

    #[test]
    fn test_keyed_tolerates_missing_themes() {
        let source = SourceCategory::Brush;
        let snapshots = [
            snapshot("light", source, &[(brush("A"), 1), (brush("B"), 2)]),
            snapshot("dark", source, &[(brush("A"), 3)]),
            snapshot("blue", source, &[(brush("A"), 5), (brush("B"), 6)]),
        ];

        let records = merge(source, &snapshots).unwrap();
        assert_eq!(records.len(), 2);

        let b = &records[1];
        assert_eq!(b.identity, "B");
        assert_eq!(b.colors.len(), 2);
        assert_eq!(b.colors.get("light"), Some(gray(2)));
        assert_eq!(b.colors.get("dark"), None);
        assert_eq!(b.colors.get("blue"), Some(gray(6)));
    }

    #[test]
    fn test_keyed_first_appearance_order() {
        let source = SourceCategory::Classification;
        let class = |n: &str| ResourceDescriptor::named(source, n);
        let snapshots = [
            snapshot("light", source, &[(class("keyword"), 1)]),
            snapshot("dark", source, &[(class("string"), 2), (class("keyword"), 3)]),
            snapshot("blue", source, &[(class("comment"), 4), (class("string"), 5)]),
        ];

        let records = merge(source, &snapshots).unwrap();
        let order: Vec<&str> = records.iter().map(|r| r.identity.as_str()).collect();
        assert_eq!(order, ["keyword", "string", "comment"]);

        for record in &records {
            assert!(!record.colors.is_empty());
            assert!(
                record
                    .colors
                    .themes()
                    .all(|t| ["light", "dark", "blue"].contains(&t.as_str()))
            );
        }
    }

    #[test]
    fn test_keyed_duplicate_identity_keeps_first() {
        let source = SourceCategory::Brush;
        let snapshots = [snapshot("light", source, &[(brush("A"), 1), (brush("A"), 9)])];

        let records = merge(source, &snapshots).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].colors.get("light"), Some(gray(1)));
    }

    #[test]
    fn test_rejects_mixed_sources_and_duplicate_themes() {
        let brushes = snapshot("light", SourceCategory::Brush, &[]);
        let classes = snapshot("dark", SourceCategory::Classification, &[]);

        assert!(matches!(
            merge(SourceCategory::Brush, &[brushes.clone(), classes]),
            Err(TcError::MixedSources { .. })
        ));
        assert!(matches!(
            merge(SourceCategory::Brush, &[brushes.clone(), brushes]),
            Err(TcError::DuplicateTheme(_))
        ));
    }

    #[test]
    fn test_no_snapshots_no_records() {
        assert!(merge(SourceCategory::RawColor, &[]).unwrap().is_empty());
        assert!(merge(SourceCategory::Brush, &[]).unwrap().is_empty());
    }
}
