use std::time::Duration;

use chrono::{TimeDelta, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

use puzzterm::core::api::{decode, LoginResponse};
use puzzterm::core::config::Config;
use puzzterm::core::game::GameEvent;
use puzzterm::core::session::SessionStore;
use puzzterm::games::bingo::{BingoSession, RoundStatus};
use puzzterm::games::climb::{ClimbChallenge, ClimbStatus, CrossClimb};
use puzzterm::games::get_game;
use puzzterm::games::grid::Cell;
use puzzterm::games::knight::{KnightTour, TourRejection, TourState};
use puzzterm::games::queens::{Placement, QueensBoard, QueensChallenge, Rejection};
use puzzterm::{Context, Difficulty, PuzzleGame};

fn press(game: &mut dyn PuzzleGame, ctx: &Context, codes: &[KeyCode]) {
    for code in codes {
        game.handle_input(KeyEvent::new(*code, KeyModifiers::NONE), ctx);
    }
}

fn drain(rx: &mut UnboundedReceiver<GameEvent>) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn crossclimb_easy_path_through_the_keyboard() {
    let (tx, mut rx) = unbounded_channel();
    let ctx = Context::new(tx);
    let mut game = get_game("climb").unwrap().launch(Difficulty::Easy);

    // Cursor starts on cell 1; the path is 2, 5, 8 down the middle column.
    press(game.as_mut(), &ctx, &[KeyCode::Right, KeyCode::Enter]);
    press(game.as_mut(), &ctx, &[KeyCode::Down, KeyCode::Enter]);
    assert!(drain(&mut rx).is_empty());
    press(game.as_mut(), &ctx, &[KeyCode::Down, KeyCode::Enter]);

    assert_eq!(drain(&mut rx), vec![GameEvent::Solved { game: "climb".into(), score: 150 }]);
}

#[test]
fn crossclimb_wrong_step_is_final() {
    let mut climb = CrossClimb::new(ClimbChallenge::for_difficulty(Difficulty::Easy));
    assert_eq!(climb.click(2), ClimbStatus::Playing);
    assert_eq!(climb.click(3), ClimbStatus::Wrong);
    assert_eq!(climb.click(5), ClimbStatus::Wrong);
    assert_eq!(climb.click(8), ClimbStatus::Wrong);
    assert_eq!(climb.climbed(), &[2]);
}

#[test]
fn bingo_first_round_evens() {
    let mut session = BingoSession::with_seed(7);
    let round = session.round_mut();
    let evens: Vec<u8> = (2..=25).step_by(2).collect();
    assert_eq!(evens.len(), 12);
    for n in &evens[..11] {
        assert_eq!(round.select(*n), RoundStatus::Playing);
    }
    assert_eq!(round.select(evens[11]), RoundStatus::Won);
    assert_eq!(round.score(), 200);

    let mut session = BingoSession::with_seed(7);
    let round = session.round_mut();
    round.select(2);
    assert_eq!(round.select(7), RoundStatus::Lost { wrong: 7 });
    assert_eq!(round.score(), 0);
    assert!(session.advance());
    assert_eq!(session.round_number(), 2);

    // A wrong pick loses however little time is left.
    let mut session = BingoSession::with_seed(11);
    let round = session.round_mut();
    assert_eq!(round.tick(Duration::from_millis(29_990)), RoundStatus::Playing);
    assert_eq!(round.select(7), RoundStatus::Lost { wrong: 7 });
    assert_eq!(round.tick(Duration::from_millis(10)), RoundStatus::Lost { wrong: 7 });
}

#[test]
fn classic_queens_reject_attacked_squares() {
    let mut board = QueensBoard::new(QueensChallenge::non_attacking(Difficulty::Easy));
    assert_eq!(board.toggle(Cell::new(0, 1)), Placement::Placed);
    assert!(board.is_under_attack(1, 2));
    assert_eq!(board.toggle(Cell::new(1, 2)), Placement::Rejected(Rejection::UnderAttack));
    for cell in [Cell::new(1, 3), Cell::new(2, 0), Cell::new(3, 2)] {
        assert_eq!(board.toggle(cell), Placement::Placed);
    }
    assert!(board.is_won());
}

#[test]
fn knight_tour_rejects_illegal_jumps() {
    let mut tour = KnightTour::for_difficulty(Difficulty::Easy);
    assert_eq!(
        tour.visit(Cell::new(2, 2)),
        Err(TourRejection::WrongStart { expected: Cell::new(0, 0) })
    );
    assert_eq!(tour.visit(Cell::new(0, 0)), Ok(TourState::Started));
    assert!(matches!(tour.visit(Cell::new(1, 1)), Err(TourRejection::NotKnightMove { .. })));
    assert_eq!(tour.visit(Cell::new(1, 2)), Ok(TourState::Extended));
    assert_eq!(tour.visit(Cell::new(0, 0)), Err(TourRejection::AlreadyVisited(Cell::new(0, 0))));
}

#[test]
fn login_survives_a_restart_and_a_401_signs_out() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().to_string_lossy().to_string();
    let config = Config::from_lookup(|key| (key == "PUZZTERM_DATA_DIR").then(|| data_dir.clone())).unwrap();

    let body = r#"{"data":{"token":"tok-1","user":{"id":1,"name":"Ada","email":"ada@example.com","role":"admin"},"expires_in":3600}}"#;
    let login: LoginResponse = decode(200, body).unwrap();

    let login_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let later = login_at + TimeDelta::minutes(20);
    let mut store = SessionStore::open(config.session_path()).unwrap();
    store.create(login, login_at).unwrap();

    let mut reopened = SessionStore::open(config.session_path()).unwrap();
    assert_eq!(reopened.bearer_header(later).as_deref(), Some("Bearer tok-1"));

    reopened.on_unauthorized().unwrap();
    assert!(!config.session_path().exists());
    assert!(SessionStore::open(config.session_path()).unwrap().current(later).is_none());
}
