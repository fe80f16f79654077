use janggi_engine::{Game, MoveOutcome, Player, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn safe_moves(game: &Game) -> Vec<(Position, Position)> {
    game.pieces(game.turn())
        .flat_map(|(from, _)| game.safe_moves_from(from).iter().map(move |to| (from, to)))
        .collect()
}

fn random_square(rng: &mut StdRng) -> Position {
    Position::from_index(rng.gen_range(0..90))
}

#[test]
fn generated_moves_never_include_origin_or_friendly_cells() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut game = Game::new();
    for _ in 0..120 {
        for player in [Player::Red, Player::Blue] {
            for (from, piece) in game.pieces(player) {
                let moves = game.legal_moves_from(from);
                assert!(!moves.contains(from), "{piece} on {from} may stay put");
                for to in moves.iter() {
                    assert_ne!(game.piece_at(to).map(|p| p.owner), Some(player), "{piece} {from}{to}");
                }
            }
        }
        let moves = safe_moves(&game);
        let Some(&(from, to)) = moves.choose(&mut rng) else { break };
        if game.apply_move(from, to).is_err() || game.status().is_over() {
            break;
        }
    }
}

#[test]
fn random_requests_are_atomic() {
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = Game::new();
        for _ in 0..150 {
            if game.status().is_over() {
                break;
            }

            // Mostly garbage requests; every rejection must leave no trace.
            for _ in 0..4 {
                let before = game.clone();
                if game.apply_move(random_square(&mut rng), random_square(&mut rng)).is_err() {
                    assert_eq!(game, before);
                } else {
                    game = before;
                }
            }

            let moves = safe_moves(&game);
            let (from, to) = match moves.choose(&mut rng) {
                Some(&mv) => mv,
                None => {
                    // No move at all: a checkmate would have ended the game.
                    assert!(!game.is_in_check(game.turn()));
                    let general = game.general_position(game.turn()).unwrap();
                    (general, general)
                }
            };

            let before = game.clone();
            let outcome = game.apply_move(from, to).unwrap();
            assert_eq!(game.verify_integrity(), Ok(()));
            if let MoveOutcome::Checkmate { winner, .. } = outcome {
                assert_eq!(winner, before.turn());
                assert!(game.is_checkmate(winner.opponent()));
                break;
            }

            assert_eq!(game.turn(), before.turn().opponent());
            assert!(!game.is_in_check(before.turn()));
            let mut undone = game.clone();
            undone.undo().unwrap();
            assert_eq!(undone, before);
        }
    }
}
