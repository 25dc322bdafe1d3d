use corelocal::{CoreLocalArray, CoreLocalConfig, MAX_SLOTS, MIN_SLOTS};

#[test]
fn config_loads_from_json() -> anyhow::Result<()> {
    let config: CoreLocalConfig = serde_json::from_str(r#"{ "parallelism": 20 }"#)?;
    assert_eq!(config.parallelism, Some(20));
    assert_eq!(config.min_slots, MIN_SLOTS);
    assert_eq!(config.slot_count(), 32);

    let config: CoreLocalConfig = serde_json::from_str(r#"{ "min_slots": 100 }"#)?;
    assert_eq!(config.parallelism, None);
    assert!(config.slot_count() >= 128);
    Ok(())
}

#[test]
fn config_round_trips_through_json() -> anyhow::Result<()> {
    let config = CoreLocalConfig::default().with_parallelism(12).with_min_slots(4);
    let text = serde_json::to_string(&config)?;
    let back: CoreLocalConfig = serde_json::from_str(&text)?;
    assert_eq!(back, config);
    Ok(())
}

#[test]
fn array_honours_config() {
    let array: CoreLocalArray<u32> =
        CoreLocalArray::with_config(CoreLocalConfig::default().with_parallelism(3).with_min_slots(64));
    assert_eq!(array.len(), 64);
    assert_eq!(array.shift(), 6);
}

#[test]
fn oversized_config_is_clamped_not_fatal() -> anyhow::Result<()> {
    let config: CoreLocalConfig = serde_json::from_str(r#"{ "min_slots": 18446744073709551615 }"#)?;
    assert_eq!(config.slot_count(), MAX_SLOTS);

    let array: CoreLocalArray<u64> = CoreLocalArray::with_config(config);
    assert_eq!(array.len(), MAX_SLOTS);
    assert_eq!(*array.access_at_core(MAX_SLOTS - 1), 0);
    Ok(())
}
