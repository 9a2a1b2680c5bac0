use super::*;

/// Draws fresh randomness on every call
#[test]
fn draws_fresh_randomness_on_every_call() {
    let draws = [
        [1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
        [11, 12, 13, 14, 15, 16, 17, 18, 19, 20],
        [1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
    ];
    let mut g = UlidGenerator::stateless_with_rand_and_time_sources(
        ScriptedRand::new(&draws),
        FixedTime(100),
    );

    assert_eq!(
        g.generate().unwrap(),
        Ulid::from_parts(100, 0x0102_0304_0506_0708_090a)
    );
    assert_eq!(
        g.generate().unwrap(),
        Ulid::from_parts(100, 0x0b0c_0d0e_0f10_1112_1314)
    );
    // the third draw repeats the first one verbatim; no increment is applied
    assert_eq!(
        g.generate().unwrap(),
        Ulid::from_parts(100, 0x0102_0304_0506_0708_090a)
    );
}

/// Emits the clock reading as is even when it goes backwards
#[test]
fn emits_the_clock_reading_as_is_even_when_it_goes_backwards() {
    let mut g = UlidGenerator::stateless_with_rand_and_time_sources(
        ConstRand([1; 10]),
        ScriptedTime::new(&[200, 100, 300]),
    );

    let ids: Vec<Ulid> = (0..3).map(|_| g.generate().unwrap()).collect();
    assert_eq!(
        ids.iter().map(|e| e.timestamp()).collect::<Vec<_>>(),
        [200, 100, 300]
    );
}

/// Never reports randomness exhaustion
#[test]
fn never_reports_randomness_exhaustion() {
    let mut g =
        UlidGenerator::stateless_with_rand_and_time_sources(ConstRand([0xff; 10]), FixedTime(100));

    for _ in 0..3 {
        assert_eq!(
            g.generate().unwrap(),
            Ulid::from_parts(100, MAX_RANDOMNESS)
        );
    }
}
