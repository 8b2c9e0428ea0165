//! UI components for the land auction dashboard.

use auction::actions::{
    check_availability, connect_wallet, determine_winner, disconnect_wallet, load_bids, submit_bid,
};
use auction::config::UI_REFRESH_INTERVAL;
use auction::{
    BidDraft, BidFilter, BidRow, BidStats, BidStatus, LandParcel, Notification, NotificationKind,
    StatusFilter,
};
use dioxus::prelude::*;
use tracing::warn;

use crate::app::state::{DashboardState, SHARED_STATE};

/// Everything the view renders, copied out of the shared state on each poll.
#[derive(Clone, Default, PartialEq)]
struct DashboardSnapshot {
    account: Option<String>,
    rows: Vec<BidRow>,
    stats: BidStats,
    notification: Option<Notification>,
    refreshing: bool,
    submitting: bool,
}

impl DashboardSnapshot {
    fn capture(state: &DashboardState) -> Self {
        Self {
            account: state.account(),
            rows: state.rows(),
            stats: state.stats(),
            notification: state.notifications.current(),
            refreshing: state.is_refreshing(),
            submitting: state.is_submitting(),
        }
    }
}

/// Wallet header with connect/disconnect and the availability check.
#[component]
pub fn WalletHeader(account: Option<String>) -> Element {
    let app_state = use_context::<DashboardState>();

    let connect = {
        let state = app_state.clone();
        move |_| {
            let state = state.clone();
            spawn(async move {
                if let Err(e) = connect_wallet(&state).await {
                    warn!("Wallet connection failed: {}", e);
                }
            });
        }
    };

    let disconnect = {
        let state = app_state.clone();
        move |_| disconnect_wallet(&state)
    };

    let check = {
        let state = app_state.clone();
        move |_| {
            let state = state.clone();
            spawn(async move {
                let _ = check_availability(&state).await;
            });
        }
    };

    let short_account = account
        .as_deref()
        .map(auction::view::shorten_address)
        .unwrap_or_default();

    rsx! {
        header {
            class: "app-header",

            div {
                class: "logo",
                h1 { "Sealed Land Auction" }
                span { class: "subtitle", "Private bids on metaverse parcels" }
            }

            div {
                class: "header-actions",

                button {
                    class: "secondary-btn",
                    onclick: check,
                    "Check Availability"
                }

                if let Some(addr) = account {
                    span { class: "account", title: "{addr}", "{short_account}" }
                    button {
                        class: "secondary-btn",
                        onclick: disconnect,
                        "Disconnect"
                    }
                } else {
                    button {
                        class: "primary-btn",
                        onclick: connect,
                        "Connect Wallet"
                    }
                }
            }
        }
    }
}

/// Stat cards.
#[component]
pub fn StatsPanel(stats: BidStats) -> Element {
    let total_value = format!("{:.2} ETH", stats.total_value);

    rsx! {
        div {
            class: "stats-grid",

            div { class: "stat-card", span { class: "stat-value", "{stats.total}" } span { class: "label", "Total Bids" } }
            div { class: "stat-card", span { class: "stat-value", "{stats.active}" } span { class: "label", "Active" } }
            div { class: "stat-card", span { class: "stat-value", "{stats.won}" } span { class: "label", "Won" } }
            div {
                class: "stat-card",
                span { class: "stat-value", "{total_value}" }
                span { class: "label", "Total Bid Value" }
            }
        }
    }
}

/// Bar chart of bids per status.
#[component]
pub fn StatusChart(stats: BidStats) -> Element {
    let bars: Vec<(String, String, String)> = stats
        .distribution()
        .iter()
        .map(|bar| {
            (
                bar.status.to_string(),
                format!("height: {:.0}%", bar.height_pct),
                format!("{} ({})", bar.status.label(), bar.count),
            )
        })
        .collect();

    rsx! {
        div {
            class: "status-chart",

            h2 { "Bid Status Distribution" }

            div {
                class: "chart-bars",
                for (status, style, caption) in bars {
                    div {
                        key: "{status}",
                        class: "chart-column",
                        div {
                            class: "chart-bar {status}",
                            style: "{style}",
                        }
                        span { class: "label", "{caption}" }
                    }
                }
            }
        }
    }
}

/// Search box, status filter and list actions.
#[component]
pub fn BidControls(
    mut search: Signal<String>,
    mut status: Signal<String>,
    refreshing: bool,
    on_new_bid: EventHandler<()>,
) -> Element {
    let app_state = use_context::<DashboardState>();

    let refresh = {
        let state = app_state.clone();
        move |_| {
            let state = state.clone();
            spawn(async move {
                let _ = load_bids(&state).await;
            });
        }
    };

    let settle = {
        let state = app_state.clone();
        move |_| {
            let state = state.clone();
            spawn(async move {
                let _ = determine_winner(&state).await;
            });
        }
    };

    let status_options = BidStatus::ALL.map(|s| (s.as_str(), s.label()));

    rsx! {
        div {
            class: "bid-controls",

            input {
                r#type: "text",
                value: "{search}",
                oninput: move |e| search.set(e.value().clone()),
                placeholder: "Search by parcel or bidder...",
            }

            select {
                value: "{status}",
                onchange: move |e| status.set(e.value().clone()),
                option { value: "all", "All statuses" }
                for (value, label) in status_options {
                    option { value: "{value}", "{label}" }
                }
            }

            button {
                class: "secondary-btn",
                onclick: refresh,
                disabled: refreshing,
                if refreshing { "Refreshing..." } else { "Refresh" }
            }

            button {
                class: "secondary-btn",
                onclick: settle,
                "Determine Winner"
            }

            button {
                class: "primary-btn",
                onclick: move |_| on_new_bid.call(()),
                "Place Sealed Bid"
            }
        }
    }
}

/// Bid table.
#[component]
pub fn BidTable(rows: Vec<BidRow>) -> Element {
    rsx! {
        div {
            class: "bid-table",

            div {
                class: "table-header",
                span { "ID" }
                span { "Parcel" }
                span { "Bidder" }
                span { "Amount" }
                span { "Date" }
                span { "Status" }
            }

            if rows.is_empty() {
                div {
                    class: "empty-state",
                    "No bids found"
                }
            }

            for row in rows {
                div {
                    key: "{row.id}",
                    class: "table-row",
                    span { class: "bid-id", "{row.short_id}" }
                    span { "{row.land_parcel}" }
                    span { class: "bidder", "{row.bidder}" }
                    span { title: "{row.sealing}", "{row.amount}" }
                    span { "{row.date}" }
                    span { class: "status-badge {row.status}", "{row.status}" }
                }
            }
        }
    }
}

/// Modal form for a new bid.
#[component]
pub fn BidFormModal(submitting: bool, on_close: EventHandler<()>) -> Element {
    let app_state = use_context::<DashboardState>();
    let mut land_parcel = use_signal(String::new);
    let mut bid_amount = use_signal(String::new);
    let mut bidder_note = use_signal(String::new);

    let submit = {
        let state = app_state.clone();
        move |_| {
            let draft = BidDraft::new(
                land_parcel.read().clone(),
                bid_amount.read().clone(),
                bidder_note.read().clone(),
            );
            let state = state.clone();

            spawn(async move {
                if submit_bid(&state, &draft).await.is_ok() {
                    land_parcel.set(String::new());
                    bid_amount.set(String::new());
                    bidder_note.set(String::new());
                    on_close.call(());
                }
            });
        }
    };

    rsx! {
        div {
            class: "modal-overlay",

            div {
                class: "modal",

                div {
                    class: "header",
                    h2 { "Place Sealed Bid" }
                    button { class: "close-btn", onclick: move |_| on_close.call(()), "×" }
                }

                p {
                    class: "notice",
                    "Amount and note are sealed before they leave this device."
                }

                form {
                    onsubmit: move |e| {
                        e.prevent_default();
                        submit(());
                    },

                    div {
                        class: "form-group",
                        label { "Land Parcel *" }
                        select {
                            value: "{land_parcel}",
                            onchange: move |e| land_parcel.set(e.value().clone()),
                            option { value: "", "Select a parcel" }
                            for parcel in LandParcel::ALL {
                                option { value: "{parcel}", "{parcel}" }
                            }
                        }
                    }

                    div {
                        class: "form-group",
                        label { "Bid Amount (ETH) *" }
                        input {
                            r#type: "number",
                            step: "0.01",
                            value: "{bid_amount}",
                            oninput: move |e| bid_amount.set(e.value().clone()),
                            placeholder: "0.00",
                        }
                    }

                    div {
                        class: "form-group",
                        label { "Private Note" }
                        textarea {
                            value: "{bidder_note}",
                            oninput: move |e| bidder_note.set(e.value().clone()),
                            placeholder: "Only visible to whoever holds the sealing key",
                        }
                    }

                    button {
                        class: "submit-btn",
                        r#type: "submit",
                        disabled: submitting,
                        if submitting { "Sealing..." } else { "Submit Sealed Bid" }
                    }
                }
            }
        }
    }
}

/// Transaction status banner.
#[component]
pub fn NotificationBanner(notification: Notification) -> Element {
    let (class, icon) = match notification.kind {
        NotificationKind::Pending => ("notification pending", "⏳"),
        NotificationKind::Success => ("notification success", "✓"),
        NotificationKind::Error => ("notification error", "✕"),
    };

    rsx! {
        div {
            class: "{class}",
            span { class: "icon", "{icon}" }
            span { "{notification.message}" }
        }
    }
}

/// Main application component.
pub fn app() -> Element {
    let Some(app_state) = SHARED_STATE.get().cloned() else {
        return rsx! { div { class: "container", "Dashboard state was not initialized" } };
    };
    use_context_provider(|| app_state.clone());

    let mut snapshot = use_signal(DashboardSnapshot::default);
    let search = use_signal(String::new);
    let status = use_signal(|| String::from("all"));
    let mut show_form = use_signal(|| false);

    // Push filter changes into the shared state
    {
        let state = app_state.clone();
        use_effect(move || {
            let filter_status = status.read().parse().unwrap_or(StatusFilter::All);
            state.set_filter(BidFilter::new(search.read().clone(), filter_status));
        });
    }

    // Initial load, then poll the shared state
    let _state_poller = use_resource(move || {
        let state = app_state.clone();
        async move {
            if let Err(e) = load_bids(&state).await {
                warn!("Initial bid load failed: {}", e);
            }
            loop {
                let next = DashboardSnapshot::capture(&state);
                if *snapshot.peek() != next {
                    snapshot.set(next);
                }
                tokio::time::sleep(UI_REFRESH_INTERVAL).await;
            }
        }
    });

    let view = snapshot.read().clone();

    rsx! {
        document::Stylesheet { href: asset!("/assets/styles.css") }

        div {
            class: "container",

            WalletHeader { account: view.account.clone() }

            if let Some(notification) = view.notification.clone() {
                NotificationBanner { notification }
            }

            StatsPanel { stats: view.stats }

            StatusChart { stats: view.stats }

            BidControls {
                search,
                status,
                refreshing: view.refreshing,
                on_new_bid: move |_| show_form.set(true),
            }

            BidTable { rows: view.rows.clone() }

            if *show_form.read() {
                BidFormModal {
                    submitting: view.submitting,
                    on_close: move |_| show_form.set(false),
                }
            }
        }
    }
}
