//! Table integration tests.

use std::collections::HashSet;

use bjtable::shoe::{compose_decks, new_deck, shuffle};
use bjtable::{
    Card, CardId, CardIds, DECK_SIZE, DeckVariant, EmptyDeckError, FollowUp, GamePhase, Hand,
    HandOutcome, Intent, PlayerId, PlayerStatus, RoundResult, Shoe, Suit, Table, TableError,
    TableOptions, Transition, resolve, score_cards,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Rank used for wild cards in rigged shoes.
const WILD: u8 = 0;

const fn card(id: u64, rank: u8) -> Card {
    Card::new(CardId(id), Suit::Spades, rank)
}

/// Builds a rigged shoe, drawn front first. Ids start at 1000.
fn rigged(ranks: &[u8]) -> Vec<Card> {
    ranks
        .iter()
        .enumerate()
        .map(|(i, &rank)| {
            let id = CardId(1000 + i as u64);
            if rank == WILD {
                Card::wild(id)
            } else {
                Card::new(id, Suit::ALL[i % 4], rank)
            }
        })
        .collect()
}

fn hand(cards: &[Card]) -> Hand {
    Hand::from_cards(cards.to_vec())
}

/// Options for rigged rounds: the shoe is only replaced once empty.
fn rigged_options(seats: usize) -> TableOptions {
    TableOptions::default()
        .with_max_seats(seats)
        .with_reshuffle_threshold(1)
}

/// Seats `seats` players named `P1`.. and has each bet 10.
fn seated(options: TableOptions, seed: u64) -> (Table, Vec<PlayerId>) {
    let seats = options.max_seats;
    let mut table = Table::new(options, seed);
    let ids: Vec<PlayerId> = (1..=seats as u64).map(PlayerId).collect();

    for (n, &id) in ids.iter().enumerate() {
        table
            .apply(id, Intent::Join { name: format!("P{}", n + 1) })
            .unwrap();
    }
    for &id in &ids {
        table.apply(id, Intent::PlaceBet { amount: 10 }).unwrap();
    }

    (table, ids)
}

fn balance(table: &Table, id: PlayerId) -> u32 {
    table.player(id).unwrap().balance()
}

#[test]
fn scoring_demotes_aces_one_at_a_time() {
    assert_eq!(score_cards(&[card(1, 1), card(2, 13)], None), 21);
    assert_eq!(score_cards(&[card(1, 1), card(2, 1)], None), 12);
    assert_eq!(score_cards(&[card(1, 1), card(2, 1), card(3, 9)], None), 21);
    assert_eq!(score_cards(&[card(1, 10), card(2, 5), card(3, 1)], None), 16);
    assert_eq!(score_cards(&[card(1, 10), card(2, 12), card(3, 2)], None), 22);
    assert_eq!(score_cards(&[], None), 0);
}

#[test]
fn wild_cards_take_the_dealer_hole_value() {
    let wild = Card::wild(CardId(1));
    let dealer = [card(10, 7), card(11, 9).with_face_down(true)];

    assert_eq!(score_cards(&[wild], Some(dealer.as_slice())), 9);
    assert_eq!(score_cards(&[wild, Card::wild(CardId(2))], Some(dealer.as_slice())), 18);
    assert_eq!(score_cards(&[wild, card(3, 1)], Some(dealer.as_slice())), 20);

    // A wild hole card defers to the dealer's face-up card.
    let wild_hole = [card(10, 4), Card::wild(CardId(12)).with_face_down(true)];
    assert_eq!(score_cards(&[wild, card(3, 10)], Some(wild_hole.as_slice())), 14);

    // Without a reference card a wild card is worth nothing yet.
    assert_eq!(score_cards(&[wild, card(3, 10)], None), 10);
    let all_up = [card(10, 7), card(11, 9)];
    assert_eq!(score_cards(&[wild], Some(all_up.as_slice())), 0);
}

#[test]
fn natural_needs_two_cards_without_wild_help() {
    assert!(hand(&[card(1, 1), card(2, 12)]).is_natural());
    assert!(!hand(&[card(1, 7), card(2, 7), card(3, 7)]).is_natural());
    assert!(!hand(&[Card::wild(CardId(1)), card(2, 1)]).is_natural());
}

#[test]
fn resolver_checks_run_in_order() {
    let natural = hand(&[card(1, 1), card(2, 13)]);
    let twenty = hand(&[card(3, 10), card(4, 12)]);
    let eighteen = hand(&[card(5, 10), card(6, 8)]);
    let three_card_21 = hand(&[card(7, 7), card(8, 7), card(9, 7)]);
    let busted = hand(&[card(10, 10), card(11, 10), card(12, 5)]);

    assert_eq!(resolve(&busted, &busted, true, true), HandOutcome::Bust);
    assert_eq!(resolve(&natural, &twenty, false, false), HandOutcome::Blackjack);
    assert_eq!(resolve(&natural, &natural, false, false), HandOutcome::Push);
    assert_eq!(resolve(&eighteen, &busted, false, true), HandOutcome::Win);
    assert_eq!(resolve(&three_card_21, &natural, false, false), HandOutcome::Lose);
    assert_eq!(resolve(&twenty, &eighteen, false, false), HandOutcome::Win);
    assert_eq!(resolve(&eighteen, &twenty, false, false), HandOutcome::Lose);
    assert_eq!(resolve(&eighteen, &eighteen, false, false), HandOutcome::Push);
}

#[test]
fn payouts_return_the_stake() {
    assert_eq!(HandOutcome::Blackjack.payout(10), 25);
    assert_eq!(HandOutcome::Blackjack.payout(5), 12);
    assert_eq!(HandOutcome::Win.payout(10), 20);
    assert_eq!(HandOutcome::Push.payout(10), 10);
    assert_eq!(HandOutcome::Lose.payout(10), 0);
    assert_eq!(HandOutcome::Bust.payout(10), 0);
}

#[test]
fn decks_have_unique_ids() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut ids = CardIds::new();

    let standard = new_deck(DeckVariant::Standard, &mut ids, &mut rng);
    assert_eq!(standard.len(), DECK_SIZE);
    assert!(standard.iter().all(|c| !c.is_wild() && !c.face_down));

    let wild = new_deck(DeckVariant::Wild, &mut ids, &mut rng);
    assert_eq!(wild.len(), 56);
    assert_eq!(wild.iter().filter(|c| c.is_wild()).count(), 4);

    let shoe = compose_decks(2, DeckVariant::Standard, &mut ids, &mut rng);
    assert_eq!(shoe.len(), 2 * DECK_SIZE);

    let all: HashSet<CardId> = standard
        .iter()
        .chain(&wild)
        .chain(&shoe)
        .map(|c| c.id)
        .collect();
    assert_eq!(all.len(), DECK_SIZE + 56 + 2 * DECK_SIZE);
}

#[test]
fn shuffle_spreads_a_card_evenly() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut ids = CardIds::new();
    let original = compose_decks(1, DeckVariant::Standard, &mut ids, &mut rng);
    let tracked = original[0].id;

    let rounds = 5200;
    let mut counts = [0_u32; DECK_SIZE];
    for _ in 0..rounds {
        let mut cards = original.clone();
        shuffle(&mut cards, &mut rng);
        let position = cards.iter().position(|c| c.id == tracked).unwrap();
        counts[position] += 1;
    }

    // Expected 100 per position with a standard deviation of about 10.
    for (position, &count) in counts.iter().enumerate() {
        assert!(
            (50..=160).contains(&count),
            "position {position} seen {count} times"
        );
    }
}

#[test]
fn shoe_draws_front_first_and_replaces_when_low() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut shoe = Shoe::new(DeckVariant::Standard, 1, 10);
    assert_eq!(shoe.draw(), Err(EmptyDeckError));

    shoe.set_cards(rigged(&[2, 3, 4]));
    assert_eq!(shoe.draw().unwrap().id, CardId(1000));
    assert_eq!(shoe.len(), 2);

    assert!(shoe.reshuffle_if_low(&mut rng));
    assert_eq!(shoe.len(), DECK_SIZE);
    assert!(shoe.cards().all(|c| c.id.0 > 1002));
    assert!(!shoe.reshuffle_if_low(&mut rng));
}

#[test]
fn options_builder_sets_fields() {
    let options = TableOptions::default()
        .with_max_seats(2)
        .with_bet_limits(1, 50)
        .with_starting_balance(200)
        .with_reshuffle_threshold(20)
        .with_decks(0)
        .with_variant(DeckVariant::Wild)
        .with_special_chance_limit(3)
        .with_auto_rebet(true);

    assert_eq!(options.max_seats, 2);
    assert_eq!((options.min_bet, options.max_bet), (1, 50));
    assert_eq!(options.starting_balance, 200);
    assert_eq!(options.reshuffle_threshold, 20);
    assert_eq!(options.decks_per_shoe, 1);
    assert!(options.variant.is_wild());
    assert_eq!(options.special_chance_limit, 3);
    assert!(options.auto_rebet);
}

#[test]
fn zero_threshold_still_replaces_an_empty_shoe() {
    let options = TableOptions {
        max_seats: 1,
        reshuffle_threshold: 0,
        decks_per_shoe: 0,
        ..TableOptions::default()
    };
    let (mut table, ids) = seated(options, 1);
    assert_eq!(table.options().reshuffle_threshold, 0);

    table.set_next_shoe(rigged(&[10, 7, 10, 8]));
    table.apply(ids[0], Intent::DealCards).unwrap();
    assert!(table.shoe().is_empty());

    table.apply(ids[0], Intent::Hit).unwrap();
    assert_eq!(table.player(ids[0]).unwrap().hand().len(), 3);
    assert_eq!(table.shoe().composed_size(), DECK_SIZE);
}

#[test]
fn join_names_and_seat_limits() {
    let mut table = Table::new(TableOptions::default(), 1);

    table
        .apply(PlayerId(1), Intent::Join { name: "  Player 2 ".into() })
        .unwrap();
    assert_eq!(table.player(PlayerId(1)).unwrap().name(), "Player 2");
    assert_eq!(table.player(PlayerId(1)).unwrap().balance(), 1000);

    // The default name skips one already in use.
    table
        .apply(PlayerId(2), Intent::Join { name: "   ".into() })
        .unwrap();
    assert_eq!(table.player(PlayerId(2)).unwrap().name(), "Player 3");

    assert_eq!(
        table.apply(PlayerId(3), Intent::Join { name: "PLAYER 2".into() }),
        Err(TableError::NameConflict)
    );
    assert!(matches!(
        table.apply(PlayerId(1), Intent::Join { name: "Again".into() }),
        Err(TableError::SeatUnavailable(_))
    ));

    table
        .apply(PlayerId(3), Intent::Join { name: "Carol".into() })
        .unwrap();
    assert!(matches!(
        table.apply(PlayerId(4), Intent::Join { name: "Dave".into() }),
        Err(TableError::SeatUnavailable(_))
    ));
    assert_eq!(table.players().len(), 3);
}

#[test]
fn bet_validation() {
    let options = TableOptions::default()
        .with_max_seats(2)
        .with_starting_balance(15);
    let mut table = Table::new(options, 1);
    let (alice, bob) = (PlayerId(1), PlayerId(2));

    assert_eq!(
        table.apply(alice, Intent::PlaceBet { amount: 10 }),
        Err(TableError::NotInGame)
    );

    table.apply(alice, Intent::Join { name: "Alice".into() }).unwrap();
    table.apply(bob, Intent::Join { name: "Bob".into() }).unwrap();

    for amount in [0, 4, 21] {
        assert!(matches!(
            table.apply(alice, Intent::PlaceBet { amount }),
            Err(TableError::InvalidAmount(_))
        ));
    }

    table.apply(alice, Intent::PlaceBet { amount: 10 }).unwrap();
    assert_eq!(balance(&table, alice), 5);
    assert!(table.player(alice).unwrap().has_placed_bet());

    assert!(matches!(
        table.apply(alice, Intent::PlaceBet { amount: 5 }),
        Err(TableError::IneligibleAction(_))
    ));

    table.apply(bob, Intent::PlaceBet { amount: 15 }).unwrap();
    table.apply(alice, Intent::DealCards).unwrap();

    assert!(matches!(
        table.apply(bob, Intent::PlaceBet { amount: 5 }),
        Err(TableError::WrongPhase { .. })
    ));
}

#[test]
fn insufficient_balance_is_an_invalid_amount() {
    let options = TableOptions::default().with_starting_balance(7);
    let mut table = Table::new(options, 1);
    table.apply(PlayerId(1), Intent::Join { name: String::new() }).unwrap();

    assert_eq!(
        table.apply(PlayerId(1), Intent::PlaceBet { amount: 10 }),
        Err(TableError::InvalidAmount("insufficient balance"))
    );
}

#[test]
fn deal_requires_a_full_table_with_bets() {
    let mut table = Table::new(TableOptions::default().with_max_seats(2), 1);
    let (alice, bob) = (PlayerId(1), PlayerId(2));

    table.apply(alice, Intent::Join { name: "Alice".into() }).unwrap();
    table.apply(alice, Intent::PlaceBet { amount: 10 }).unwrap();
    assert!(matches!(
        table.apply(alice, Intent::DealCards),
        Err(TableError::IncompleteTable(_))
    ));

    table.apply(bob, Intent::Join { name: "Bob".into() }).unwrap();
    assert!(matches!(
        table.apply(alice, Intent::DealCards),
        Err(TableError::IncompleteTable(_))
    ));

    table.apply(bob, Intent::PlaceBet { amount: 5 }).unwrap();
    table.apply(bob, Intent::DealCards).unwrap();
    assert!(matches!(
        table.apply(bob, Intent::DealCards),
        Err(TableError::WrongPhase { .. })
    ));
}

#[test]
fn basic_win_with_live_dealer_draws() {
    let (mut table, ids) = seated(rigged_options(1), 1);
    let alice = ids[0];
    table.set_next_shoe(rigged(&[10, 9, 10, 6, 2]));

    table.apply(alice, Intent::DealCards).unwrap();
    assert_eq!(table.phase(), GamePhase::Playing);
    assert_eq!(table.current_player(), Some(alice));
    assert_eq!(table.player(alice).unwrap().score(), 19);

    let transition = table.apply(alice, Intent::Stand).unwrap();

    // One broadcast per dealer draw, then the settled state.
    assert_eq!(transition.snapshots.len(), 2);
    assert_eq!(transition.snapshots[0].game_status, GamePhase::DealerTurn);
    assert_eq!(transition.snapshots[0].dealer_hand.len(), 3);
    assert_eq!(transition.snapshots[1].game_status, GamePhase::Finished);
    assert_eq!(transition.snapshots[1].dealer_score, 18);

    let result = transition.result.unwrap();
    assert_eq!(result.dealer_value, 18);
    assert_eq!(result.players[0].outcome, HandOutcome::Win);
    assert_eq!(result.players[0].payout, 20);

    let player = table.player(alice).unwrap();
    assert_eq!(player.result(), Some(HandOutcome::Win));
    assert_eq!(player.status(), PlayerStatus::Finished);
    assert_eq!(player.balance(), 1010);
    assert_eq!(table.phase(), GamePhase::Finished);
}

#[test]
fn all_naturals_settle_on_the_deal() {
    let (mut table, ids) = seated(rigged_options(1), 1);
    table.set_next_shoe(rigged(&[1, 13, 1, 12]));

    let transition = table.apply(ids[0], Intent::DealCards).unwrap();
    assert_eq!(table.phase(), GamePhase::Finished);

    let result = transition.result.unwrap();
    assert!(result.dealer_blackjack);
    assert_eq!(result.players[0].outcome, HandOutcome::Push);
    assert_eq!(balance(&table, ids[0]), 1000);
}

#[test]
fn natural_pays_three_to_two() {
    let (mut table, ids) = seated(rigged_options(1), 1);
    table.set_next_shoe(rigged(&[1, 13, 10, 9]));

    let transition = table.apply(ids[0], Intent::DealCards).unwrap();
    assert_eq!(
        transition.result.unwrap().players[0].outcome,
        HandOutcome::Blackjack
    );
    assert_eq!(balance(&table, ids[0]), 1015);
}

#[test]
fn hit_to_bust_ends_the_turn() {
    let (mut table, ids) = seated(rigged_options(1), 1);
    let alice = ids[0];
    table.set_next_shoe(rigged(&[10, 2, 10, 7, 3, 12]));
    table.apply(alice, Intent::DealCards).unwrap();

    table.apply(alice, Intent::Hit).unwrap();
    assert_eq!(table.player(alice).unwrap().score(), 15);
    assert_eq!(table.current_player(), Some(alice));

    let transition = table.apply(alice, Intent::Hit).unwrap();
    let result = transition.result.unwrap();
    assert_eq!(result.players[0].outcome, HandOutcome::Bust);
    assert_eq!(table.player(alice).unwrap().result(), Some(HandOutcome::Bust));
    assert_eq!(balance(&table, alice), 990);
}

#[test]
fn double_then_bust() {
    let (mut table, ids) = seated(rigged_options(1), 1);
    let alice = ids[0];
    table.set_next_shoe(rigged(&[10, 6, 10, 7, 10]));
    table.apply(alice, Intent::DealCards).unwrap();

    let transition = table.apply(alice, Intent::Double).unwrap();

    let player = table.player(alice).unwrap();
    assert_eq!(player.hand().len(), 3);
    assert_eq!(player.bet(), 20);
    assert_eq!(player.balance(), 980);
    assert_eq!(player.result(), Some(HandOutcome::Bust));

    let result = transition.result.unwrap();
    assert_eq!(result.players[0].bet, 20);
    assert_eq!(result.players[0].payout, 0);
    assert_eq!(table.phase(), GamePhase::Finished);
}

#[test]
fn double_win_pays_the_doubled_bet() {
    let (mut table, ids) = seated(rigged_options(1), 1);
    let alice = ids[0];
    table.set_next_shoe(rigged(&[6, 5, 10, 7, 10]));
    table.apply(alice, Intent::DealCards).unwrap();

    let transition = table.apply(alice, Intent::Double).unwrap();
    assert_eq!(transition.result.unwrap().players[0].payout, 40);
    assert_eq!(balance(&table, alice), 1020);
}

#[test]
fn double_eligibility() {
    let options = rigged_options(1).with_starting_balance(25);
    let (mut table, ids) = seated(options, 1);
    let alice = ids[0];
    table.set_next_shoe(rigged(&[2, 3, 10, 7, 2, 2, 2]));
    table.apply(alice, Intent::DealCards).unwrap();

    // 15 left after betting 10 cannot cover 20.
    assert_eq!(
        table.apply(alice, Intent::Double),
        Err(TableError::IneligibleAction("insufficient balance to double"))
    );

    table.apply(alice, Intent::Hit).unwrap();
    assert!(matches!(
        table.apply(alice, Intent::Double),
        Err(TableError::IneligibleAction(_))
    ));
}

#[test]
fn turns_skip_finished_seats() {
    let (mut table, ids) = seated(rigged_options(3), 1);
    let (p1, p2, p3) = (ids[0], ids[1], ids[2]);
    table.set_next_shoe(rigged(&[10, 6, 1, 13, 10, 7, 10, 8]));

    table.apply(p1, Intent::DealCards).unwrap();
    assert_eq!(table.current_player(), Some(p1));
    assert_eq!(
        table.player(p2).unwrap().result(),
        Some(HandOutcome::Blackjack)
    );

    assert_eq!(table.apply(p2, Intent::Hit), Err(TableError::NotYourTurn));
    assert_eq!(table.apply(p3, Intent::Stand), Err(TableError::NotYourTurn));

    table.apply(p1, Intent::Stand).unwrap();
    assert_eq!(table.current_player(), Some(p3));
    assert_eq!(table.current_player_index(), 2);
    assert_eq!(table.apply(p1, Intent::Hit), Err(TableError::NotYourTurn));

    let result = table.apply(p3, Intent::Stand).unwrap().result.unwrap();
    let outcomes: Vec<HandOutcome> = result.players.iter().map(|p| p.outcome).collect();
    assert_eq!(
        outcomes,
        [HandOutcome::Lose, HandOutcome::Blackjack, HandOutcome::Lose]
    );
}

#[test]
fn rejected_intents_leave_the_table_unchanged() {
    let (mut table, ids) = seated(rigged_options(2), 1);
    let (p1, p2) = (ids[0], ids[1]);
    table.set_next_shoe(rigged(&[10, 6, 10, 7, 10, 8, 5, 5]));
    table.apply(p1, Intent::DealCards).unwrap();

    let before = table.snapshot();
    let rejected = [
        (p2, Intent::Hit),
        (p2, Intent::Double),
        (p1, Intent::PlaceBet { amount: 10 }),
        (p1, Intent::DealCards),
        (p1, Intent::RequestSpecialChance { card_index: 0 }),
        (p1, Intent::ShuffleFaceDownCards),
        (PlayerId(99), Intent::Stand),
        (PlayerId(99), Intent::Join { name: "P1".into() }),
    ];

    for (id, intent) in rejected {
        assert!(table.apply(id, intent).is_err());
        assert_eq!(table.snapshot(), before);
    }
}

#[test]
fn disconnect_mid_round_refunds_everyone() {
    let (mut table, ids) = seated(rigged_options(2), 1);
    let (p1, p2) = (ids[0], ids[1]);
    table.set_next_shoe(rigged(&[10, 6, 10, 7, 10, 8, 5, 5]));
    table.apply(p1, Intent::DealCards).unwrap();

    let transition = table.disconnect(p2);

    assert_eq!(table.phase(), GamePhase::Finished);
    assert_eq!(table.players().len(), 1);
    let player = table.player(p1).unwrap();
    assert_eq!(player.status(), PlayerStatus::Finished);
    assert_eq!(player.balance(), 1000);
    assert_eq!(player.bet(), 0);

    let last = transition.snapshots.last().unwrap();
    assert_eq!(
        last.disconnect_message.as_deref(),
        Some("P2 disconnected. Game ended. All bets have been returned.")
    );
    assert_eq!(table.apply(p1, Intent::Hit), Err(TableError::WrongPhase {
        phase: GamePhase::Finished
    }));
}

#[test]
fn disconnect_while_idle_keeps_the_table() {
    let mut table = Table::new(TableOptions::default(), 1);
    for id in 1..=3 {
        table
            .apply(PlayerId(id), Intent::Join { name: String::new() })
            .unwrap();
    }

    let transition = table.disconnect(PlayerId(2));
    assert_eq!(transition.snapshots.len(), 1);
    assert_eq!(transition.snapshots[0].disconnect_message, None);
    assert_eq!(table.phase(), GamePhase::Waiting);
    assert_eq!(table.players().len(), 2);

    // Unknown connections are ignored.
    assert_eq!(table.disconnect(PlayerId(2)), Transition::default());
}

#[test]
fn last_player_leaving_resets_the_table() {
    let (mut table, ids) = seated(TableOptions::default().with_max_seats(1), 9);
    table.apply(ids[0], Intent::DealCards).unwrap();

    table.disconnect(ids[0]);
    assert_eq!(table.phase(), GamePhase::Waiting);
    assert!(table.players().is_empty());
    assert!(table.dealer_hand().is_empty());
    assert_eq!(table.cards_remaining(), 0);
}

#[test]
fn low_shoe_is_replaced_before_drawing() {
    let options = TableOptions::default().with_max_seats(1);
    let (mut table, ids) = seated(options, 5);
    // Twelve cards: the fourth draw of the deal finds nine and replaces the
    // shoe.
    table.set_next_shoe(rigged(&[10, 9, 10, 2, 2, 2, 2, 2, 2, 2, 2, 2]));

    table.apply(ids[0], Intent::DealCards).unwrap();

    assert_eq!(table.cards_remaining(), DECK_SIZE - 1);
    let player = table.player(ids[0]).unwrap();
    assert_eq!(player.score(), 19);
    assert_eq!(table.dealer_hand().cards()[0].id, CardId(1002));
    assert!(table.dealer_hand().cards()[1].id.0 > 1011);

    let live: Vec<CardId> = table
        .players()
        .iter()
        .flat_map(|p| p.hand().cards())
        .chain(table.dealer_hand().cards())
        .chain(table.shoe().cards())
        .map(|c| c.id)
        .collect();
    let unique: HashSet<CardId> = live.iter().copied().collect();
    assert_eq!(unique.len(), live.len());
}

#[test]
fn dealt_cards_come_from_one_shoe() {
    let (mut table, ids) = seated(TableOptions::default(), 11);
    table.apply(ids[0], Intent::DealCards).unwrap();

    let live: Vec<CardId> = table
        .players()
        .iter()
        .flat_map(|p| p.hand().cards())
        .chain(table.dealer_hand().cards())
        .chain(table.shoe().cards())
        .map(|c| c.id)
        .collect();
    let unique: HashSet<CardId> = live.iter().copied().collect();

    assert_eq!(live.len(), DECK_SIZE);
    assert_eq!(unique.len(), DECK_SIZE);
    assert_eq!(table.cards_remaining(), DECK_SIZE - 8);
}

#[test]
fn money_is_conserved_over_many_rounds() {
    let (mut table, ids) = seated(TableOptions::default(), 77);

    for round in 0..60 {
        if round > 0 {
            table.apply(ids[0], Intent::NewGame).unwrap();
            for &id in &ids {
                table.apply(id, Intent::PlaceBet { amount: 10 }).unwrap();
            }
        }

        let before: Vec<u32> = ids.iter().map(|&id| balance(&table, id) + 10).collect();

        let mut settled: Option<RoundResult> = table.apply(ids[0], Intent::DealCards).unwrap().result;
        while let Some(id) = table.current_player() {
            let intent = if table.player(id).unwrap().score() < 17 {
                Intent::Hit
            } else {
                Intent::Stand
            };
            if let Some(result) = table.apply(id, intent).unwrap().result {
                settled = Some(result);
            }
        }

        assert_eq!(table.phase(), GamePhase::Finished);
        let result = settled.unwrap();
        assert_eq!(result.players.len(), ids.len());

        for (i, &id) in ids.iter().enumerate() {
            let settlement = result.players[i];
            assert_eq!(settlement.player_id, id);
            assert_eq!(
                balance(&table, id),
                before[i] - settlement.bet + settlement.payout,
                "round {round}"
            );
        }
    }
}

#[test]
fn new_game_resets_and_refunds() {
    let (mut table, ids) = seated(rigged_options(2), 3);
    table.set_next_shoe(rigged(&[10, 6, 10, 7, 10, 8]));
    table.apply(ids[0], Intent::DealCards).unwrap();

    table.apply(ids[1], Intent::NewGame).unwrap();

    assert_eq!(table.phase(), GamePhase::Waiting);
    assert!(table.dealer_hand().is_empty());
    assert_eq!(table.cards_remaining(), 0);
    for player in table.players() {
        assert!(player.hand().is_empty());
        assert_eq!(player.bet(), 0);
        assert!(!player.has_placed_bet());
        assert_eq!(player.status(), PlayerStatus::Waiting);
        assert_eq!(player.result(), None);
        assert_eq!(player.balance(), 1000);
    }

    assert_eq!(
        table.apply(PlayerId(50), Intent::NewGame),
        Err(TableError::NotInGame)
    );
}

#[test]
fn auto_rebet_deals_straight_away() {
    let options = rigged_options(1).with_auto_rebet(true);
    let (mut table, ids) = seated(options, 1);
    let alice = ids[0];
    table.set_next_shoe(rigged(&[10, 9, 10, 8]));
    table.apply(alice, Intent::DealCards).unwrap();
    table.apply(alice, Intent::Stand).unwrap();
    assert_eq!(balance(&table, alice), 1010);

    table.apply(alice, Intent::NewGame).unwrap();

    let player = table.player(alice).unwrap();
    assert!(player.has_placed_bet());
    assert_eq!(player.hand().len(), 2);
    assert_ne!(table.phase(), GamePhase::Waiting);
    assert!(player.balance() == 1000 || player.result().is_some());
}

#[test]
fn snapshot_wire_shape() {
    let (mut table, ids) = seated(rigged_options(2), 1);
    table.set_next_shoe(rigged(&[10, 6, 10, 7, 10, 8]));
    table.apply(ids[0], Intent::DealCards).unwrap();

    let value = serde_json::to_value(table.snapshot()).unwrap();

    assert_eq!(value["deck"]["length"], 0);
    assert_eq!(value["gameStatus"], "playing");
    assert_eq!(value["currentPlayerIndex"], 0);
    assert_eq!(value["dealerScore"], 18);
    assert_eq!(value["dealerHand"][0]["suit"], "hearts");
    assert_eq!(value["dealerHand"][0]["rank"], "10");
    assert_eq!(value["dealerHand"][0]["id"], "hearts-10-1004");
    assert_eq!(value["dealerHand"][0]["isFaceDown"], false);
    assert_eq!(value["disconnectMessage"], serde_json::Value::Null);

    let first = &value["players"][0];
    assert_eq!(first["id"], "conn-1");
    assert_eq!(first["name"], "P1");
    assert_eq!(first["status"], "playing");
    assert_eq!(first["result"], serde_json::Value::Null);
    assert_eq!(first["isCurrentPlayer"], true);
    assert_eq!(first["balance"], 990);
    assert_eq!(first["bet"], 10);
    assert_eq!(first["hasPlacedBet"], true);
    assert_eq!(first["specialChancesUsed"], 0);
    assert_eq!(first["isUsingSpecialChance"], false);
    assert_eq!(value["players"][1]["isCurrentPlayer"], false);
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(TableError::NotInGame.code(), "NOT_IN_GAME");
    assert_eq!(TableError::NotYourTurn.code(), "NOT_YOUR_TURN");
    assert_eq!(
        TableError::WrongPhase {
            phase: GamePhase::DealerTurn
        }
        .to_string(),
        "cannot do that while the table is dealer-turn"
    );
    assert_eq!(TableError::from(EmptyDeckError).code(), "EMPTY_DECK");
}

fn wild_options(seats: usize) -> TableOptions {
    rigged_options(seats).with_variant(DeckVariant::Wild)
}

#[test]
fn wild_deal_hides_second_cards() {
    let (mut table, ids) = seated(wild_options(1), 1);
    table.set_next_shoe(rigged(&[WILD, 9, 5, 8]));
    table.apply(ids[0], Intent::DealCards).unwrap();

    let player = table.player(ids[0]).unwrap();
    assert!(!player.hand().cards()[0].face_down);
    assert!(player.hand().cards()[1].face_down);
    assert!(table.dealer_hand().cards()[1].face_down);

    // 9 plus a wild card worth the dealer's hidden 8.
    assert_eq!(player.score(), 17);
    assert_eq!(table.dealer_hand().score(None), 13);

    let snapshot = table.snapshot();
    assert_eq!(snapshot.players[0].hand[0].id, "wild-WILD-1000");
    assert!(snapshot.dealer_hand[1].is_face_down);
}

#[test]
fn face_down_shuffle_keeps_one_card_per_holder() {
    let (mut table, ids) = seated(wild_options(2), 4);
    table.set_next_shoe(rigged(&[2, 3, 4, 5, 6, 7, 9, 9, 9]));
    table.apply(ids[0], Intent::DealCards).unwrap();
    let remaining = table.cards_remaining();

    let hidden = |table: &Table| -> HashSet<CardId> {
        table
            .players()
            .iter()
            .flat_map(|p| p.hand().cards())
            .chain(table.dealer_hand().cards())
            .filter(|c| c.face_down)
            .map(|c| c.id)
            .collect()
    };
    let before = hidden(&table);

    table.apply(ids[1], Intent::ShuffleFaceDownCards).unwrap();

    assert_eq!(hidden(&table), before);
    assert_eq!(table.cards_remaining(), remaining);
    for player in table.players() {
        assert_eq!(player.hand().len(), 2);
        assert!(player.hand().cards()[1].face_down);
        assert_eq!(player.score(), player.hand().score(Some(table.dealer_hand())));
    }
    assert_eq!(table.dealer_hand().len(), 2);
    assert!(table.dealer_hand().cards()[1].face_down);
}

#[test]
fn wild_actions_need_the_wild_variant_and_cards_in_play() {
    let (mut table, ids) = seated(rigged_options(1), 1);
    assert!(matches!(
        table.apply(ids[0], Intent::ShuffleFaceDownCards),
        Err(TableError::IneligibleAction(_))
    ));

    table.apply(ids[0], Intent::DealCards).unwrap();
    assert!(matches!(
        table.apply(ids[0], Intent::RequestSpecialChance { card_index: 0 }),
        Err(TableError::IneligibleAction(_))
    ));

    let (mut wild, ids) = seated(wild_options(1), 1);
    assert_eq!(
        wild.apply(ids[0], Intent::ShuffleFaceDownCards),
        Err(TableError::WrongPhase {
            phase: GamePhase::Waiting
        })
    );
}

fn special_chance(transition: &Transition) -> (PlayerId, u64) {
    match transition.follow_up {
        Some(FollowUp::SpecialChance { player, ticket, .. }) => (player, ticket),
        None => panic!("no special chance scheduled"),
    }
}

#[test]
fn special_chance_swaps_a_card_after_the_delay() {
    let (mut table, ids) = seated(wild_options(1), 1);
    let alice = ids[0];
    table.set_next_shoe(rigged(&[10, 6, 10, 7, 5, 9]));
    table.apply(alice, Intent::DealCards).unwrap();
    assert_eq!(table.player(alice).unwrap().score(), 16);

    let requested = table
        .apply(alice, Intent::RequestSpecialChance { card_index: 1 })
        .unwrap();
    let (player, ticket) = special_chance(&requested);
    assert_eq!(player, alice);
    assert!(matches!(
        requested.follow_up,
        Some(FollowUp::SpecialChance { delay, .. }) if delay.as_millis() == 600
    ));

    let pending = requested.snapshots.last().unwrap().player(alice).unwrap();
    assert!(pending.is_using_special_chance);
    assert_eq!(pending.status, "playing");

    // The seat is mid-action until the swap resolves.
    assert!(matches!(
        table.apply(alice, Intent::Hit),
        Err(TableError::IneligibleAction(_))
    ));
    assert!(matches!(
        table.apply(alice, Intent::RequestSpecialChance { card_index: 0 }),
        Err(TableError::IneligibleAction(_))
    ));

    let resolved = table.resolve_special_chance(alice, ticket).unwrap();
    assert_eq!(resolved.snapshots.len(), 1);

    let player = table.player(alice).unwrap();
    assert_eq!(player.score(), 15);
    assert_eq!(player.special_chances_used(), 1);
    assert_eq!(player.status(), PlayerStatus::Playing);
    assert!(!player.hand().cards()[1].face_down);

    // A stale ticket does nothing.
    assert_eq!(
        table.resolve_special_chance(alice, ticket).unwrap(),
        Transition::default()
    );
}

#[test]
fn pending_special_chance_blocks_the_seat() {
    let (mut table, ids) = seated(wild_options(1), 1);
    let alice = ids[0];
    table.set_next_shoe(rigged(&[10, 6, 10, 7, 5, 9]));
    table.apply(alice, Intent::DealCards).unwrap();

    let requested = table
        .apply(alice, Intent::RequestSpecialChance { card_index: 1 })
        .unwrap();
    let (_, ticket) = special_chance(&requested);
    let before = table.snapshot();

    for intent in [
        Intent::ShuffleFaceDownCards,
        Intent::NewGame,
        Intent::DealCards,
        Intent::PlaceBet { amount: 10 },
        Intent::Stand,
        Intent::Double,
    ] {
        assert_eq!(
            table.apply(alice, intent.clone()),
            Err(TableError::IneligibleAction(
                "your special chance is still being resolved"
            )),
            "{intent:?}"
        );
    }
    assert_eq!(table.snapshot(), before);

    // The swap still lands on the card that was asked for.
    table.resolve_special_chance(alice, ticket).unwrap();
    let player = table.player(alice).unwrap();
    assert_eq!(player.hand().cards()[1].id, CardId(1004));
    assert_eq!(player.score(), 15);

    table.apply(alice, Intent::NewGame).unwrap();
    assert_eq!(table.phase(), GamePhase::Waiting);
}

#[test]
fn special_chance_bust_ends_the_turn() {
    let (mut table, ids) = seated(wild_options(1), 1);
    let alice = ids[0];
    table.set_next_shoe(rigged(&[10, 6, 10, 7, 5, 13]));
    table.apply(alice, Intent::DealCards).unwrap();
    table.apply(alice, Intent::Hit).unwrap();
    assert_eq!(table.player(alice).unwrap().score(), 21);

    let requested = table
        .apply(alice, Intent::RequestSpecialChance { card_index: 2 })
        .unwrap();
    let (_, ticket) = special_chance(&requested);
    let resolved = table.resolve_special_chance(alice, ticket).unwrap();

    assert_eq!(table.phase(), GamePhase::Finished);
    assert_eq!(
        resolved.result.unwrap().players[0].outcome,
        HandOutcome::Bust
    );
}

#[test]
fn special_chance_limits() {
    let options = wild_options(1).with_special_chance_limit(1);
    let (mut table, ids) = seated(options, 1);
    let alice = ids[0];
    table.set_next_shoe(rigged(&[10, 2, 10, 7, 3, 2, 2]));
    table.apply(alice, Intent::DealCards).unwrap();

    assert!(matches!(
        table.apply(alice, Intent::RequestSpecialChance { card_index: 2 }),
        Err(TableError::IneligibleAction("invalid card index"))
    ));

    let requested = table
        .apply(alice, Intent::RequestSpecialChance { card_index: 0 })
        .unwrap();
    let (_, ticket) = special_chance(&requested);
    table.resolve_special_chance(alice, ticket).unwrap();

    assert!(matches!(
        table.apply(alice, Intent::RequestSpecialChance { card_index: 0 }),
        Err(TableError::IneligibleAction(_))
    ));
}

#[test]
fn special_chance_is_dropped_when_the_seat_leaves() {
    let (mut table, ids) = seated(wild_options(2), 1);
    let (p1, p2) = (ids[0], ids[1]);
    table.set_next_shoe(rigged(&[10, 6, 10, 5, 10, 7, 9, 9]));
    table.apply(p1, Intent::DealCards).unwrap();

    let requested = table
        .apply(p1, Intent::RequestSpecialChance { card_index: 0 })
        .unwrap();
    let (_, ticket) = special_chance(&requested);

    table.disconnect(p1);
    let before = table.snapshot();

    assert_eq!(
        table.resolve_special_chance(p1, ticket).unwrap(),
        Transition::default()
    );
    assert_eq!(table.snapshot(), before);
    assert_eq!(table.player(p2).unwrap().balance(), 1000);
}
