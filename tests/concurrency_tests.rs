//! Concurrent access to shared resolvers.

use config_resolver::{
    ConfigurationResolver, Descriptor, Pattern, PatternResolver, RelationalNormalizer,
    StructuralResolver,
};
use std::sync::Arc;
use std::thread;

const READERS: usize = 8;
const WRITES: usize = 200;

#[test]
fn resolvers_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StructuralResolver<Arc<String>, RelationalNormalizer>>();
    assert_send_sync::<PatternResolver<Arc<String>>>();
    assert_send_sync::<config_resolver::Resolver<String, Arc<String>>>();
}

#[test]
fn readers_see_consistent_snapshots_during_writes() -> anyhow::Result<()> {
    let resolver = StructuralResolver::new(RelationalNormalizer::new());
    resolver.add(Descriptor::any(), usize::MAX);

    thread::scope(|scope| {
        scope.spawn(|| {
            for index in 0..WRITES {
                resolver.add(Descriptor::fields([("database", format!("db_{index}"))]), index);
            }
        });

        for reader in 0..READERS {
            let resolver = &resolver;
            scope.spawn(move || {
                for round in 0..WRITES {
                    let database = format!("db_{}", (round + reader) % WRITES);
                    let probe = Descriptor::fields([
                        ("adapter", "mysql2".to_string()),
                        ("database", database.clone()),
                    ]);

                    // Either the specific matcher has landed or the wildcard answers
                    let value = resolver.resolve(&probe).expect("wildcard always matches");
                    assert!(value == usize::MAX || format!("db_{value}") == database);

                    let configurations = resolver.configurations();
                    assert_eq!(configurations[0].1, usize::MAX);
                    assert!(configurations.len() <= WRITES + 1);
                }
            });
        }
    });

    assert_eq!(resolver.configurations().len(), WRITES + 1);
    let last = Descriptor::fields([("database", format!("db_{}", WRITES - 1))]);
    anyhow::ensure!(resolver.resolve(&last) == Some(WRITES - 1), "last write must win");
    Ok(())
}

#[test]
fn pattern_resolver_shared_across_threads() {
    let resolver: Arc<PatternResolver<usize>> = Arc::new(PatternResolver::new());
    for index in 0..16 {
        resolver.add(Pattern::literal(format!("svc-{index}")), index);
    }

    let handles: Vec<_> = (0..READERS)
        .map(|reader| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                for index in 0..16 {
                    let probe = format!("svc-{}", (index + reader) % 16);
                    assert_eq!(resolver.resolve(probe.as_str()), Some((index + reader) % 16));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("reader thread panicked");
    }
}

#[test]
fn reset_during_reads_never_tears() {
    let resolver = StructuralResolver::new(RelationalNormalizer::new());

    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..WRITES {
                resolver.add(Descriptor::fields([("host", "a")]), 1);
                resolver.add(Descriptor::fields([("host", "b")]), 2);
                resolver.reset();
            }
        });

        scope.spawn(|| {
            for _ in 0..WRITES {
                let configurations = resolver.configurations();
                // Inserts happen in order, so a snapshot is a prefix of [a, b]
                let values: Vec<_> = configurations.iter().map(|(_, v)| *v).collect();
                assert!(values.is_empty() || values == [1] || values == [1, 2]);
            }
        });
    });
}
