use crossterm::event::KeyCode;

use road_shooter::input::*;

#[test]
fn arrows_and_wasd_share_directions() {
    assert_eq!(key_down(&KeyCode::Up), key_down(&KeyCode::Char('w')));
    assert_eq!(key_down(&KeyCode::Left), Some(Control::Press(Direction::Left)));
    assert_eq!(key_down(&KeyCode::Char('d')), Some(Control::Press(Direction::Right)));
}

#[test]
fn space_shoots_and_f_is_the_shoot_button() {
    assert_eq!(key_down(&KeyCode::Char(' ')), Some(Control::Shoot));
    assert_eq!(key_down(&KeyCode::Char('f')), Some(Control::ShootButton));
}

#[test]
fn release_only_clears_its_axis() {
    assert_eq!(key_up(&KeyCode::Char('s')), Some(Control::Release(Axis::Vertical)));
    assert_eq!(key_up(&KeyCode::Right), Some(Control::Release(Axis::Horizontal)));
    assert_eq!(key_up(&KeyCode::Char(' ')), None);
}

#[test]
fn letters_are_case_sensitive() {
    assert_eq!(key_down(&KeyCode::Char('W')), None);
}

#[test]
fn lifecycle_keys() {
    assert_eq!(command_for(&KeyCode::Enter), Some(Command::Start));
    assert_eq!(command_for(&KeyCode::Char('p')), Some(Command::Pause));
    assert_eq!(command_for(&KeyCode::Char('o')), Some(Command::Resume));
    assert_eq!(command_for(&KeyCode::Char('r')), Some(Command::Reset));
    assert_eq!(command_for(&KeyCode::Esc), Some(Command::Quit));
    assert_eq!(command_for(&KeyCode::Char('w')), None);
}
