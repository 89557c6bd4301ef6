use super::*;

#[test]
fn test_default_sampler_is_linear_repeat() {
    let sampler = Sampler::default();
    assert_eq!(sampler.min_filter(), FilterMode::Linear);
    assert_eq!(sampler.address_u(), AddressMode::Repeat);
}

#[test]
fn test_sampler_mark_dirty() {
    let sampler = Sampler::default();
    assert_eq!(sampler.current_version(), 0);
    sampler.mark_dirty();
    assert_eq!(sampler.current_version(), 1);
}
