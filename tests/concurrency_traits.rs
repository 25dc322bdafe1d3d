use core::cell::Cell;
use core::sync::atomic::AtomicU64;
use corelocal::{CoreLocalArray, CurrentCpu, FixedCore, NoCoreId, PaddedCoreLocalArray, ThreadRandom};

fn assert_send<T: Send>() {}
fn assert_sync<T: Sync>() {}

#[test]
fn sources_are_send_and_sync() {
    assert_send::<CurrentCpu>();
    assert_sync::<CurrentCpu>();
    assert_send::<ThreadRandom>();
    assert_sync::<ThreadRandom>();
    assert_sync::<NoCoreId>();
    assert_sync::<FixedCore>();
}

#[test]
fn array_send_sync_follows_t_bounds() {
    // Atomic slots can be shared across threads.
    assert_send::<CoreLocalArray<AtomicU64>>();
    assert_sync::<CoreLocalArray<AtomicU64>>();
    assert_sync::<PaddedCoreLocalArray<AtomicU64>>();

    // `Cell<u64>` is Send but not Sync, so the array can move but not be shared.
    assert_send::<CoreLocalArray<Cell<u64>>>();
}
