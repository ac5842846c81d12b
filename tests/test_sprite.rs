use ship_xb11::sprite::*;

fn animated(frames: usize, delay: u32) -> Sprite {
    let mut s = Sprite::new(SpriteFrames::blank(32, 32, frames));
    s.is_visible = true;
    s.is_animated = true;
    s.frame_delay = delay;
    s
}

#[test]
fn new_sprite_is_hidden_and_still() {
    let s = Sprite::new(SpriteFrames::blank(48, 64, 8));
    assert!(!s.is_visible);
    assert!(!s.is_animated);
    assert_eq!((s.width, s.height), (48, 64));
    assert_eq!(s.frame_count, 7);
    assert_eq!(s.current_frame, 0);
    assert_eq!(s.current_handle(), Some(FrameId(0)));
}

#[test]
fn advance_without_delay_cycles_every_call() {
    let mut s = animated(3, 0);
    let seen: Vec<usize> = (0..6)
        .map(|_| {
            s.advance_frame();
            s.current_frame
        })
        .collect();
    assert_eq!(seen, vec![1, 2, 0, 1, 2, 0]);
}

#[test]
fn advance_holds_each_frame_for_delay_plus_one_calls() {
    let mut s = animated(3, 2);
    s.advance_frame();
    assert_eq!(s.current_frame, 1);
    s.advance_frame();
    s.advance_frame();
    assert_eq!(s.current_frame, 1);
    s.advance_frame();
    assert_eq!(s.current_frame, 2);
}

#[test]
fn hidden_or_still_sprites_do_not_animate() {
    let mut hidden = animated(2, 0);
    hidden.is_visible = false;
    hidden.advance_frame();
    assert_eq!(hidden.current_frame, 0);

    let mut still = animated(2, 0);
    still.is_animated = false;
    still.advance_frame();
    assert_eq!(still.current_frame, 0);
}

#[test]
fn stop_animation_rewinds() {
    let mut s = animated(4, 3);
    for _ in 0..9 {
        s.advance_frame();
    }
    assert_ne!(s.current_frame, 0);
    s.stop_animation();
    assert!(!s.is_animated);
    assert_eq!(s.current_frame, 0);
    assert_eq!(s.next_frame_time, 0);
}

#[test]
fn step_applies_velocity() {
    let mut s = animated(1, 0);
    s.move_to(10.0, 20.0);
    s.dx = -0.25;
    s.dy = 1.0;
    s.step();
    s.step();
    assert_eq!((s.x, s.y), (9.5, 22.0));
}

#[test]
fn centre_halves_size_in_whole_pixels() {
    let mut s = Sprite::new(SpriteFrames::blank(5, 7, 1));
    s.move_to(10.5, 0.0);
    assert_eq!(s.centre(), (12.5, 3.0));
}

#[test]
fn single_frame_sprite_stays_on_frame_zero() {
    let mut s = animated(1, 0);
    for _ in 0..5 {
        s.advance_frame();
        assert_eq!(s.current_frame, 0);
    }
}
