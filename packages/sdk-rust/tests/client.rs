//! End-to-end tests for the file-backed client.

use std::fs;
use std::path::PathBuf;

use reward_swap::{Address, Asset, Direction, PoolError, PoolEvent};
use reward_swap_sdk::{
    CreatePoolParams, Error, ProvideParams, RemoveParams, SwapClient, SwapParams,
};
use tempfile::TempDir;

fn owner() -> Address {
    Address::from("owner")
}

fn new_pool(dir: &TempDir, reward_rate_bps: u16) -> (SwapClient, PathBuf) {
    let path = dir.path().join("pool.json");
    let (client, _) = SwapClient::create(&path, CreatePoolParams {
        owner:        owner(),
        pool_address: Address::from("pool"),
        reward_rate_bps,
    })
    .unwrap();
    (client, path)
}

fn provide(client: &mut SwapClient, who: &Address, amount_a: u64, amount_b: Option<u64>) -> u64 {
    client
        .provide_liquidity(who, ProvideParams { amount_a, amount_b, min_shares: 0 })
        .unwrap()
        .shares_minted
}

#[test]
fn create_refuses_to_overwrite_and_open_requires_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let (_, path) = new_pool(&dir, 30);

    let again = SwapClient::create(&path, CreatePoolParams {
        owner:           owner(),
        pool_address:    Address::from("pool"),
        reward_rate_bps: 30,
    });
    assert!(matches!(again, Err(Error::StateExists(_))));
    assert!(matches!(
        SwapClient::open(dir.path().join("missing.json")),
        Err(Error::StateNotFound(_))
    ));
}

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, path) = new_pool(&dir, 100);
    let alice = Address::from("alice");
    let bob = Address::from("bob");
    let carol = Address::from("carol");

    for who in [&alice, &bob, &carol] {
        client.faucet(who, 100_000).unwrap();
    }
    assert_eq!(provide(&mut client, &alice, 10_000, Some(10_000)), 10_000);
    // proportional B from reserves
    assert_eq!(provide(&mut client, &bob, 5_000, None), 5_000);

    let swap = client
        .convert(&carol, SwapParams { direction: Direction::AToB, amount_in: 3_000, max_slippage_bps: 50 })
        .unwrap();
    assert_eq!(swap.amount_out, 2_500);
    assert_eq!(swap.estimated_out, 2_500);
    assert_eq!(swap.min_amount_out, 2_488);
    assert_eq!(swap.reward_fee, 30);
    drop(client);

    let reopened = SwapClient::open(&path).unwrap();
    let info = reopened.pool_info();
    assert_eq!((info.reserve_a, info.reserve_b, info.total_shares), (18_000, 12_500, 15_000));
    assert_eq!(info.providers, 2);
    assert_eq!(reopened.my_position(&alice).unwrap().pending_reward, 20);
    assert_eq!(reopened.my_position(&bob).unwrap().pending_reward, 10);
    assert_eq!(reopened.balances(&carol).token_b, 102_500);

    let history = reopened.history();
    assert_eq!(history.len(), 7);
    assert!(matches!(history.last(), Some(PoolEvent::Swapped { amount_out: 2_500, .. })));
}

#[test]
fn empty_pool_needs_an_explicit_amount_b() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, _) = new_pool(&dir, 30);
    let alice = Address::from("alice");
    client.faucet(&alice, 1_000).unwrap();

    let err = client
        .provide_liquidity(&alice, ProvideParams { amount_a: 100, amount_b: None, min_shares: 0 })
        .unwrap_err();
    assert!(matches!(err, Error::AmountBRequired));
    assert!(matches!(client.simulate(Direction::AToB, 10), Err(Error::NoLiquidity)));
}

#[test]
fn refused_operation_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, path) = new_pool(&dir, 30);
    let alice = Address::from("alice");
    client.faucet(&alice, 10_000).unwrap();
    provide(&mut client, &alice, 1_000, Some(1_000));
    let before = fs::read(&path).unwrap();

    let err = client.claim_rewards(&alice).unwrap_err();
    assert!(matches!(err, Error::Pool(PoolError::NothingToClaim)));
    let err = client
        .remove_liquidity(&alice, RemoveParams { shares: Some(1_001), ..RemoveParams::default() })
        .unwrap_err();
    assert!(matches!(err, Error::Pool(PoolError::InsufficientShares { requested: 1_001, held: 1_000 })));

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn partial_then_full_removal() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, _) = new_pool(&dir, 30);
    let alice = Address::from("alice");
    client.faucet(&alice, 10_000).unwrap();
    provide(&mut client, &alice, 1_000, Some(4_000));

    let part = client
        .remove_liquidity(&alice, RemoveParams { shares: Some(500), min_a: 250, min_b: 1_000 })
        .unwrap();
    assert_eq!((part.amount_a, part.amount_b, part.shares_burned, part.shares_left), (250, 1_000, 500, 1_500));

    let rest = client.remove_liquidity(&alice, RemoveParams::default()).unwrap();
    assert_eq!((rest.amount_a, rest.amount_b, rest.shares_left), (750, 3_000, 0));
    assert_eq!(client.balances(&alice).token_a, 10_000);
}

#[test]
fn owner_sweeps_only_the_surplus() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, _) = new_pool(&dir, 30);
    let alice = Address::from("alice");
    let pool = Address::from("pool");
    client.faucet(&alice, 10_000).unwrap();
    provide(&mut client, &alice, 1_000, Some(1_000));
    client.send(&alice, &pool, Asset::A, 300).unwrap();

    assert!(matches!(
        client.emergency_withdraw(&alice, Asset::A, 300),
        Err(Error::Pool(PoolError::Unauthorized))
    ));
    assert!(matches!(
        client.emergency_withdraw(&owner(), Asset::A, 301),
        Err(Error::Pool(PoolError::InsufficientLiquidity))
    ));
    let swept = client.emergency_withdraw(&owner(), Asset::A, 300).unwrap();
    assert_eq!(swept.to, owner());
    assert_eq!(client.balances(&owner()).token_a, 300);
    assert_eq!(client.pool_info().reserve_a, 1_000);
}

#[test]
fn rate_change_is_persisted_and_owner_only() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, path) = new_pool(&dir, 30);

    assert!(matches!(
        client.set_reward_rate(&Address::from("mallory"), 50),
        Err(Error::Pool(PoolError::Unauthorized))
    ));
    assert!(matches!(
        client.set_reward_rate(&owner(), 10_001),
        Err(Error::Pool(PoolError::RateOutOfRange(10_001)))
    ));
    assert_eq!(client.set_reward_rate(&owner(), 250).unwrap().reward_rate_bps, 250);
    assert_eq!(SwapClient::open(&path).unwrap().pool_info().reward_rate_bps, 250);
}
