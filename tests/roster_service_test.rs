use chrono::NaiveDate;
use std::sync::Arc;
use volleyroster::application::roster_service::RosterService;
use volleyroster::domain::condition::{ConditionDraft, PlayerCondition};
use volleyroster::domain::court::CourtPosition;
use volleyroster::domain::errors::{RosterError, ValidationError};
use volleyroster::domain::formation::{FormationDraft, RosterSlot};
use volleyroster::domain::player::{
    Player, PlayerDraft, PlayerQuery, PlayerRole, PlayerSkills, PlayerSort,
};
use volleyroster::infrastructure::{
    InMemoryConditionRepository, InMemoryFormationRepository, InMemoryPlayerRepository,
};

fn service() -> RosterService {
    RosterService::new(
        Arc::new(InMemoryPlayerRepository::new()),
        Arc::new(InMemoryConditionRepository::new()),
        Arc::new(InMemoryFormationRepository::new()),
    )
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

async fn add(service: &RosterService, name: &str, number: u8, spike: u8) -> Player {
    let mut skills = PlayerSkills::default();
    skills.spike = spike;
    service
        .create_player(PlayerDraft::new(name, number, PlayerRole::OutsideHitter).with_skills(skills))
        .await
        .unwrap()
}

async fn six_players(service: &RosterService) -> Vec<Player> {
    let mut players = Vec::new();
    for n in 1..=6 {
        players.push(add(service, &format!("Player {}", n), n, 50 + n).await);
    }
    players
}

fn formation_draft(name: &str, players: &[Player]) -> FormationDraft {
    let slots = CourtPosition::ALL
        .iter()
        .zip(players)
        .map(|(position, player)| RosterSlot::new(*position, player.id.clone()))
        .collect();
    FormationDraft::new(name, slots)
}

fn roster_error(err: &anyhow::Error) -> &RosterError {
    err.downcast_ref::<RosterError>()
        .expect("expected a RosterError")
}

#[tokio::test]
async fn test_player_lifecycle() {
    let service = service();
    let player = add(&service, "Taro Tanaka", 1, 85).await;

    let mut draft = PlayerDraft::from(&player);
    draft.name = "Taro Tanaka Jr.".to_string();
    draft.height_cm = Some(186);
    let updated = service.update_player(&player.id, draft).await.unwrap();

    assert_eq!(updated.id, player.id);
    assert_eq!(updated.name, "Taro Tanaka Jr.");
    assert_eq!(updated.created_at, player.created_at);
    assert!(updated.updated_at >= player.updated_at);

    service.delete_player(&player.id).await.unwrap();
    let err = service.get_player(&player.id).await.unwrap_err();
    assert!(matches!(roster_error(&err), RosterError::PlayerNotFound { .. }));
}

#[tokio::test]
async fn test_update_rejects_invalid_jersey_number() {
    let service = service();
    let player = add(&service, "Jiro Sato", 2, 90).await;

    let mut draft = PlayerDraft::from(&player);
    draft.number = 100;
    let err = service.update_player(&player.id, draft).await.unwrap_err();

    assert!(matches!(
        roster_error(&err),
        RosterError::Validation(ValidationError::OutOfRange { .. })
    ));
    let stored = service.get_player(&player.id).await.unwrap().player;
    assert_eq!(stored.number, 2);
}

#[tokio::test]
async fn test_search_and_sort() {
    let service = service();
    add(&service, "Taro Tanaka", 1, 85).await;
    add(&service, "Jiro Sato", 2, 90).await;
    add(&service, "Saburo Suzuki", 13, 75).await;

    let by_name = service
        .list_players(&PlayerQuery::default().search("sato"))
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].name, "Jiro Sato");

    // A numeric term matches the jersey number exactly, not as a substring
    let by_number = service
        .list_players(&PlayerQuery::default().search("1"))
        .await
        .unwrap();
    assert_eq!(by_number.len(), 1);
    assert_eq!(by_number[0].number, 1);

    let by_spike = service
        .list_players(&PlayerQuery::default().sorted_by(PlayerSort::Spike))
        .await
        .unwrap();
    let spikes: Vec<u8> = by_spike.iter().map(|p| p.skills.spike).collect();
    assert_eq!(spikes, vec![90, 85, 75]);

    let by_number = service
        .list_players(&PlayerQuery::default().sorted_by(PlayerSort::Number))
        .await
        .unwrap();
    let numbers: Vec<u8> = by_number.iter().map(|p| p.number).collect();
    assert_eq!(numbers, vec![1, 2, 13]);
}

#[tokio::test]
async fn test_condition_upsert_overwrites_same_day() {
    let service = service();
    let player = add(&service, "Goro Ito", 5, 40).await;

    let first = service
        .upsert_condition(ConditionDraft::new(&player.id, date(1)))
        .await
        .unwrap();
    assert_eq!((first.health, first.fatigue, first.motivation), (3, 3, 3));
    assert_eq!(first.pain, 0);

    let mut draft =
        ConditionDraft::new(&player.id, date(1)).with_condition(PlayerCondition::new(5, 1, 4));
    draft.pain = 2;
    draft.pain_area = Some("ankle".to_string());
    let second = service.upsert_condition(draft).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.health, 5);
    assert_eq!(second.pain_area.as_deref(), Some("ankle"));

    let history = service.player_conditions(&player.id, None).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_condition_rejects_out_of_range_values() {
    let service = service();
    let player = add(&service, "Goro Ito", 5, 40).await;

    let mut draft = ConditionDraft::new(&player.id, date(1));
    draft.pain = 6;
    let err = service.upsert_condition(draft).await.unwrap_err();

    assert!(matches!(
        roster_error(&err),
        RosterError::Validation(ValidationError::OutOfRange { .. })
    ));
    assert!(service.conditions_on(date(1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_condition() {
    let service = service();
    let player = add(&service, "Goro Ito", 5, 40).await;
    let record = service
        .upsert_condition(ConditionDraft::new(&player.id, date(2)))
        .await
        .unwrap();

    let removed = service.delete_condition(&record.id).await.unwrap();
    assert_eq!(removed.id, record.id);
    assert!(service.conditions_on(date(2)).await.unwrap().is_empty());

    let err = service.delete_condition(&record.id).await.unwrap_err();
    assert!(matches!(
        roster_error(&err),
        RosterError::ConditionNotFound { .. }
    ));
}

#[tokio::test]
async fn test_player_in_formation_cannot_be_deleted() {
    let service = service();
    let players = six_players(&service).await;
    let formation = service
        .create_formation(formation_draft("Base", &players))
        .await
        .unwrap();

    let err = service.delete_player(&players[0].id).await.unwrap_err();
    match roster_error(&err) {
        RosterError::PlayerInFormation { formations, .. } => {
            assert_eq!(formations, &vec!["Base".to_string()]);
        }
        other => panic!("unexpected error: {}", other),
    }

    service.delete_formation(&formation.id).await.unwrap();
    service.delete_player(&players[0].id).await.unwrap();
}

#[tokio::test]
async fn test_deleting_player_removes_conditions() {
    let service = service();
    let player = add(&service, "Rokuro Watanabe", 6, 80).await;
    for day in 1..=3 {
        service
            .upsert_condition(ConditionDraft::new(&player.id, date(day)))
            .await
            .unwrap();
    }

    service.delete_player(&player.id).await.unwrap();

    for day in 1..=3 {
        assert!(service.conditions_on(date(day)).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_formation_validation() {
    let service = service();
    let players = six_players(&service).await;

    let short = formation_draft("Short", &players[..5]);
    let err = service.create_formation(short).await.unwrap_err();
    assert!(matches!(
        roster_error(&err),
        RosterError::Validation(ValidationError::FormationSize { count: 5 })
    ));

    let mut duplicate = formation_draft("Duplicate", &players);
    duplicate.slots[5].position = CourtPosition::new(1).unwrap();
    let err = service.create_formation(duplicate).await.unwrap_err();
    assert!(matches!(
        roster_error(&err),
        RosterError::Validation(ValidationError::DuplicatePosition { position: 1 })
    ));

    let blank = formation_draft("  ", &players);
    let err = service.create_formation(blank).await.unwrap_err();
    assert!(matches!(
        roster_error(&err),
        RosterError::Validation(ValidationError::Required { .. })
    ));

    assert!(service.list_formations().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_formation_detail_in_position_order() {
    let service = service();
    let players = six_players(&service).await;

    let mut slots: Vec<RosterSlot> = CourtPosition::ALL
        .iter()
        .rev()
        .zip(&players)
        .map(|(position, player)| RosterSlot::new(*position, player.id.clone()))
        .collect();
    slots[0] = slots[0].clone().libero();
    let formation = service
        .create_formation(FormationDraft::new("Reversed", slots))
        .await
        .unwrap();

    let detail = service.get_formation(&formation.id).await.unwrap();
    let positions: Vec<u8> = detail.members.iter().map(|m| m.slot.position.value()).collect();
    assert_eq!(positions, vec![1, 2, 3, 4, 5, 6]);

    // Player 1 was placed at position 6 as libero
    let last = &detail.members[5];
    assert!(last.slot.is_libero);
    assert_eq!(last.player.as_ref().unwrap().number, 1);
}

#[tokio::test]
async fn test_simulate_uses_conditions_for_the_date() {
    let service = service();
    let players = six_players(&service).await;
    let formation = service
        .create_formation(formation_draft("Base", &players))
        .await
        .unwrap();

    // Peak condition for everyone on day 1 only
    for player in &players {
        service
            .upsert_condition(
                ConditionDraft::new(&player.id, date(1))
                    .with_condition(PlayerCondition::new(5, 1, 5)),
            )
            .await
            .unwrap();
    }

    let boosted = service.simulate(&formation.id, date(1)).await.unwrap();
    let neutral = service.simulate(&formation.id, date(2)).await.unwrap();

    assert_eq!(boosted.rotations.len(), 6);
    assert_eq!(boosted.conditions_recorded, 6);
    assert_eq!(neutral.conditions_recorded, 0);

    for (b, n) in boosted.rotations.iter().zip(&neutral.rotations) {
        assert!((b.metrics.attack - n.metrics.attack * 1.2).abs() < 1e-9);
        assert!((b.metrics.serve - n.metrics.serve * 1.2).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_simulate_unknown_formation() {
    let service = service();
    let err = service.simulate("missing", date(1)).await.unwrap_err();
    assert!(matches!(
        roster_error(&err),
        RosterError::FormationNotFound { .. }
    ));
}

#[tokio::test]
async fn test_dashboard_flags_players_needing_attention() {
    let service = service();
    let healthy = add(&service, "Healthy", 1, 50).await;
    let tired = add(&service, "Tired", 2, 50).await;
    let hurt = add(&service, "Hurt", 3, 50).await;
    add(&service, "Unrecorded", 4, 50).await;

    service
        .upsert_condition(
            ConditionDraft::new(&healthy.id, date(3)).with_condition(PlayerCondition::new(5, 1, 5)),
        )
        .await
        .unwrap();
    service
        .upsert_condition(
            ConditionDraft::new(&tired.id, date(3)).with_condition(PlayerCondition::new(3, 4, 3)),
        )
        .await
        .unwrap();
    let mut hurt_draft = ConditionDraft::new(&hurt.id, date(3));
    hurt_draft.pain = 3;
    service.upsert_condition(hurt_draft).await.unwrap();

    let dashboard = service.dashboard(date(3)).await.unwrap();

    assert_eq!(dashboard.roster_size, 4);
    assert_eq!(dashboard.summary.recorded, 3);
    let avg_health = dashboard.summary.avg_health.unwrap();
    assert!((avg_health - 11.0 / 3.0).abs() < 1e-9);

    let mut flagged: Vec<&str> = dashboard
        .attention
        .iter()
        .map(|entry| entry.player_name.as_str())
        .collect();
    flagged.sort();
    assert_eq!(flagged, vec!["Hurt", "Tired"]);

    let empty = service.dashboard(date(4)).await.unwrap();
    assert_eq!(empty.summary.recorded, 0);
    assert!(empty.summary.avg_health.is_none());
    assert!(empty.attention.is_empty());
}
