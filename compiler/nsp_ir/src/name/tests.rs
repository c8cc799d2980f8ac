use super::*;

#[test]
fn test_shard_and_local_round_trip() {
    let name = Name::new(7, 1234);
    assert_eq!(name.shard(), 7);
    assert_eq!(name.local(), 1234);
}

#[test]
fn test_empty_is_default() {
    assert_eq!(Name::default(), Name::EMPTY);
    assert_eq!(Name::EMPTY.raw(), 0);
}

#[test]
fn test_max_local_in_last_shard() {
    let name = Name::new(15, Name::MAX_LOCAL);
    assert_eq!(name.shard(), 15);
    assert_eq!(name.local(), Name::MAX_LOCAL as usize);
}
