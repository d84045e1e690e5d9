use matcap::capture::{AllocationPolicy, BufferPool, CapacityGovernor, SequentialReader};
use matcap::config::CaptureConfig;
use matcap::control::{Attribute, ControlSurface};
use matcap::domain::{CaptureError, CoreId};

fn config(cpus: usize, limit: u64) -> CaptureConfig {
    CaptureConfig {
        cpu_count: cpus,
        segments_per_core: 8,
        buffer_limit: limit,
        allocation_policy: AllocationPolicy::Atomic,
    }
}

#[test]
fn test_read_spans_two_segments_and_stops_at_fill() {
    let mut pool = BufferPool::new(CoreId(0), 8);
    pool.allocate_all(1000, AllocationPolicy::Atomic).unwrap();
    for i in 0..1500u64 {
        assert!(pool.record(i));
    }
    assert_eq!(pool.segments()[0].size(), 1000);
    assert_eq!(pool.segments()[1].size(), 500);
    assert!(pool.segments()[2..].iter().all(|s| s.size() == 0));

    let reader = SequentialReader::new(&pool);
    let mut out = Vec::new();
    assert_eq!(reader.read(0, 12_000, &mut out).unwrap(), 12_000);
    assert_eq!(out.len(), 12_000);
    // last element of segment 0, first of segment 1
    assert_eq!(out[7992..8000], 999u64.to_ne_bytes());
    assert_eq!(out[8000..8008], 1000u64.to_ne_bytes());
    assert_eq!(out[11_992..], 1499u64.to_ne_bytes());

    let mut rejected = Vec::new();
    assert!(matches!(
        reader.read(0, 12_001, &mut rejected),
        Err(CaptureError::OutOfRange { available: 12_000, .. })
    ));
    assert!(rejected.is_empty());
}

#[test]
fn test_configure_zero_is_noop_when_empty() {
    let mut surface = ControlSurface::new(config(4, 1 << 20));
    surface.configure(0, None).unwrap();
    surface.configure(0, None).unwrap();
    assert_eq!(surface.status().total_capacity, 0);
}

#[test]
fn test_configure_single_core() {
    let mut surface = ControlSurface::new(config(4, 1 << 20));
    surface.configure(2, Some(100)).unwrap();

    let report = surface.status();
    let capacities: Vec<u64> = report.cores.iter().map(|c| c.capacity).collect();
    assert_eq!(capacities, vec![0, 0, 800, 0]);

    let text = surface.show(Attribute::Buffers);
    assert!(text.contains("CPU  1:  8# capacity=0 (0 MiB)"));
    assert!(text.contains("CPU  2:  8# capacity=800 (0 MiB)"));
    assert!(text.contains("CPU  3:  8# capacity=0 (0 MiB)"));
}

#[test]
fn test_governor_exact_limit() {
    // 4 cores * 8 segments * 8 bytes * 512 samples
    let limit = 4 * 8 * 8 * 512;
    let mut surface = ControlSurface::new(config(4, limit));

    surface.configure(512, None).unwrap();
    assert_eq!(CapacityGovernor::current_total(surface.state().pools()), limit);

    assert!(matches!(
        surface.configure(513, None),
        Err(CaptureError::CapacityExceeded { .. })
    ));
    // rejected requests keep the previous buffers
    assert_eq!(CapacityGovernor::current_total(surface.state().pools()), limit);

    surface.configure(1, Some(256)).unwrap();
    assert!(surface.configure(1, Some(513)).is_err());
}

#[test]
fn test_reset_is_idempotent() {
    let mut pool = BufferPool::new(CoreId(3), 8);
    pool.allocate_all(16, AllocationPolicy::Atomic).unwrap();
    pool.record(1);

    pool.reset();
    let once: Vec<(usize, usize)> =
        pool.segments().iter().map(|s| (s.capacity(), s.size())).collect();
    pool.reset();
    let twice: Vec<(usize, usize)> =
        pool.segments().iter().map(|s| (s.capacity(), s.size())).collect();

    assert_eq!(once, twice);
    assert!(!pool.is_live());
    assert_eq!(pool.active_index(), 0);
}

#[test]
fn test_zero_length_read_after_allocation() {
    for capacity in [0, 1, 1000] {
        let mut pool = BufferPool::new(CoreId(0), 8);
        pool.allocate_all(capacity, AllocationPolicy::Atomic).unwrap();
        let reader = SequentialReader::new(&pool);
        assert_eq!(reader.read(0, 0, &mut Vec::new()), Ok(0), "capacity {capacity}");
    }
}

#[test]
fn test_read_requires_enabled_and_selected_core() {
    let mut surface = ControlSurface::new(config(2, 1 << 20));
    surface.store(Attribute::Buffers, "4").unwrap();
    surface.store(Attribute::Cpu, "0").unwrap();
    assert_eq!(surface.read(0, 0, &mut Vec::new()), Err(CaptureError::Disabled));

    surface.store(Attribute::BuffersEnabled, "1").unwrap();
    surface.state_mut().record(CoreId(0), 0xabc);
    let mut out = Vec::new();
    assert_eq!(surface.read(0, 8, &mut out), Ok(8));
    assert_eq!(out, 0xabc_u64.to_ne_bytes());
}
