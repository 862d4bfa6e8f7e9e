//! # Marketplace Scenarios
//!
//! End-to-end flows through the public API: issue, list, bid, accept and
//! settle, with the event stream read from a channel publisher.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use chrono::NaiveDate;
use instrument_market::application::{
    Clock, ManualClock, Marketplace, PlaceAskRequest, PlaceBidRequest,
};
use instrument_market::domain::entities::{AskFilter, InstrumentTerms, ListingFilter};
use instrument_market::domain::errors::DomainError;
use instrument_market::domain::events::{MarketEvent, MarketEventBody};
use instrument_market::domain::value_objects::{
    AcquisitionReason, Actor, AskStatus, BidStatus, CompanyId, Currency, ExecutionMode,
    InstrumentStatus, ListingStatus, MaturityStatus, Timestamp, UserId, UserRole,
};
use instrument_market::infrastructure::ChannelPublisher;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::mpsc;

fn actor(role: UserRole) -> Actor {
    Actor::new(UserId::new_v4(), CompanyId::new_v4(), role)
}

fn usd() -> Currency {
    Currency::new("usd").unwrap()
}

fn terms() -> InstrumentTerms {
    InstrumentTerms {
        name: "Trade receivable Q3".to_string(),
        face_value: dec!(10000),
        currency: usd(),
        maturity_date: NaiveDate::from_ymd_opt(2030, 9, 30).unwrap(),
        maturity_payment: dec!(10400),
        public_payload: Some(serde_json::json!({ "debtor": "ACME", "rating": "B+" })),
    }
}

fn drain(receiver: &mut mpsc::Receiver<MarketEvent>) -> Vec<MarketEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn issue_list_bid_accept_and_settle() {
    let start = Timestamp::from_unix_secs(1_750_000_000).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let (publisher, mut receiver) = ChannelPublisher::new(256);
    let market = Marketplace::in_memory(clock.clone(), Arc::new(publisher));

    let admin = actor(UserRole::Admin);
    let c = actor(UserRole::Issuer);
    let d = actor(UserRole::Buyer);
    let e = actor(UserRole::Buyer);

    // Issue.
    let draft = market.instruments().create_draft(&c, terms()).await.unwrap();
    market
        .transition_instrument(draft.id(), InstrumentStatus::PendingApproval, &c)
        .await
        .unwrap();
    let approved = market
        .transition_instrument(draft.id(), InstrumentStatus::Active, &admin)
        .await
        .unwrap();
    assert_eq!(approved.instrument.maturity_status(), MaturityStatus::Due);
    assert_eq!(
        market.ledger().current_owner(draft.id()).await.unwrap().unwrap().owner_id(),
        c.company_id
    );

    // List and quote.
    clock.advance_secs(60);
    let listing = market.listings().create(draft.id(), &c).await.unwrap();
    let ask = market
        .asks()
        .place(
            &c,
            PlaceAskRequest::new(listing.id(), dec!(10200), usd())
                .execution_mode(ExecutionMode::Manual)
                .valid_until(start.add_secs(86_400)),
        )
        .await
        .unwrap();

    // Bid.
    clock.advance_secs(60);
    let d_bid = market
        .bids()
        .place(&d, PlaceBidRequest::new(listing.id(), dec!(10000), usd()))
        .await
        .unwrap();
    let e_bid = market
        .bids()
        .place(&e, PlaceBidRequest::new(listing.id(), dec!(9900), usd()))
        .await
        .unwrap();
    assert_eq!(d_bid.status(), BidStatus::Pending);

    // Accept.
    clock.advance_secs(60);
    let acceptance = market.bids().accept(d_bid.id(), &c).await.unwrap();
    assert_eq!(acceptance.selected.id(), d_bid.id());
    assert_eq!(acceptance.selected.status(), BidStatus::Selected);
    assert_eq!(
        market.bids().get(e_bid.id()).await.unwrap().unwrap().status(),
        BidStatus::NotSelected
    );
    assert_eq!(
        market.asks().get(ask.id()).await.unwrap().unwrap().status(),
        AskStatus::Active
    );

    // Settle: close the listing and move ownership to the buyer.
    market
        .listings()
        .transition(listing.id(), ListingStatus::Closed, &admin)
        .await
        .unwrap();
    let settled_at = clock.now();
    let opened = market
        .ledger()
        .transfer(draft.id(), c.company_id, d.company_id, AcquisitionReason::Trade)
        .await
        .unwrap();
    assert_eq!(opened.acquired_at(), settled_at);

    let history = market.ledger().history(draft.id()).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].owner_id(), c.company_id);
    assert_eq!(history[0].acquisition_reason(), AcquisitionReason::Issuance);
    assert_eq!(history[0].relinquished_at(), Some(settled_at));
    assert_eq!(history[1].owner_id(), d.company_id);
    assert_eq!(history[1].acquisition_reason(), AcquisitionReason::Trade);

    // The buyer can now list it again.
    let relisted = market.listings().create(draft.id(), &d).await.unwrap();
    assert_eq!(relisted.seller_company_id(), d.company_id);

    let names: Vec<&str> = drain(&mut receiver).iter().map(MarketEvent::name).collect();
    assert_eq!(
        names,
        vec![
            "instrument_created",
            "instrument_status_changed",
            "instrument_status_changed",
            "ownership_issued",
            "listing_opened",
            "ask_placed",
            "bid_placed",
            "bid_placed",
            "bid_selected",
            "listing_status_changed",
            "ownership_transferred",
            "listing_opened",
        ]
    );
}

#[tokio::test]
async fn events_serialize_with_a_type_tag() {
    let clock = Arc::new(ManualClock::new(Timestamp::from_unix_secs(1_750_000_000).unwrap()));
    let (publisher, mut receiver) = ChannelPublisher::new(16);
    let market = Marketplace::in_memory(clock, Arc::new(publisher));
    let issuer = actor(UserRole::Issuer);

    let draft = market.instruments().create_draft(&issuer, terms()).await.unwrap();
    let event = drain(&mut receiver).pop().unwrap();
    assert!(matches!(
        event.body(),
        MarketEventBody::InstrumentCreated { instrument_id, .. } if *instrument_id == draft.id()
    ));

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "instrument_created");
    let back: MarketEvent = serde_json::from_value(json).unwrap();
    assert_eq!(back, event);
}

#[tokio::test]
async fn queries_filter_across_listings() {
    let clock = Arc::new(ManualClock::new(Timestamp::from_unix_secs(1_750_000_000).unwrap()));
    let (publisher, _receiver) = ChannelPublisher::new(256);
    let market = Marketplace::in_memory(clock, Arc::new(publisher));
    let admin = actor(UserRole::Admin);
    let seller = actor(UserRole::Seller);

    let mut listings = Vec::new();
    for _ in 0..3 {
        let draft = market.instruments().create_draft(&seller, terms()).await.unwrap();
        market
            .transition_instrument(draft.id(), InstrumentStatus::PendingApproval, &seller)
            .await
            .unwrap();
        market
            .transition_instrument(draft.id(), InstrumentStatus::Active, &admin)
            .await
            .unwrap();
        listings.push(market.listings().create(draft.id(), &seller).await.unwrap());
    }
    market
        .listings()
        .transition(listings[0].id(), ListingStatus::Suspended, &admin)
        .await
        .unwrap();
    for (listing, mode) in listings.iter().skip(1).zip([ExecutionMode::Auto, ExecutionMode::Manual]) {
        market
            .asks()
            .place(
                &seller,
                PlaceAskRequest::new(listing.id(), dec!(10100), usd()).execution_mode(mode),
            )
            .await
            .unwrap();
    }

    let open = market
        .listings()
        .search(&ListingFilter {
            status: Some(ListingStatus::Open),
            seller_company_ids: vec![seller.company_id],
            ..ListingFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(open.len(), 2);

    let auto = market
        .asks()
        .search(&AskFilter {
            execution_mode: Some(ExecutionMode::Auto),
            ..AskFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(auto.len(), 1);
    assert_eq!(auto[0].listing_id(), listings[1].id());

    assert_eq!(market.instruments().issued_by(seller.company_id).await.unwrap().len(), 3);
    assert_eq!(market.ledger().holdings(seller.company_id).await.unwrap().len(), 3);

    // Bidding on the suspended listing is refused.
    let err = market
        .bids()
        .place(&actor(UserRole::Buyer), PlaceBidRequest::new(listings[0].id(), dec!(1), usd()))
        .await
        .unwrap_err();
    assert!(matches!(
        err.domain(),
        Some(DomainError::ListingNotOpen { status: ListingStatus::Suspended, .. })
    ));
}
