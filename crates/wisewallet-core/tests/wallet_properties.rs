use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use wisewallet_core::{
    category_hash, FixedClock, MemoryStore, ProfileUpdate, RecordingSink, SignUpForm, Wallet,
    WalletEvent, WalletSettings, CATEGORY_NOTIFICATION_BASE_ID, DEFAULT_USERNAME,
    MONTHLY_NOTIFICATION_ID,
};
use wisewallet_domain::{AlertDimension, ExpenseDraft, Username};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn wallet_on(day: NaiveDate) -> (Wallet<MemoryStore>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let wallet = Wallet::new(MemoryStore::new())
        .with_clock(Arc::new(FixedClock::new(day)))
        .with_alert_sink(sink.clone());
    (wallet, sink)
}

fn spend(
    wallet: &Wallet<MemoryStore>,
    user: &Username,
    category: &str,
    amount: f64,
    day: NaiveDate,
) {
    wallet
        .add_expense(user, ExpenseDraft::new("purchase", category, amount, day))
        .expect("add expense");
}

fn sign_up_form(username: &str) -> SignUpForm {
    SignUpForm {
        username: username.into(),
        email: format!("{username}@example.com"),
        phone: String::new(),
        password: "secret1".into(),
        confirm_password: "secret1".into(),
    }
}

#[test]
fn monthly_overage_alerts_once_until_inputs_change() {
    let today = date(2026, 10, 19);
    let (wallet, sink) = wallet_on(today);
    let user = Username::new("ana");
    wallet.save_monthly_budget(&user, 500.0).expect("budget");
    spend(&wallet, &user, "Rent", 450.0, date(2026, 10, 1));
    assert!(sink.alerts().is_empty());

    let update = wallet
        .add_expense(&user, ExpenseDraft::new("Groceries", "Food", 150.0, today))
        .expect("add expense");
    assert_eq!(update.alerts.len(), 1);
    let alert = &update.alerts[0];
    assert_eq!(alert.id, MONTHLY_NOTIFICATION_ID);
    assert_eq!(alert.title, "Monthly Budget Exceeded");
    assert_eq!(alert.overage, 100.0);
    assert!(alert.body.ends_with("$100.00"));
    assert!(wallet.notification_state(&user).expect("state").monthly_notified);

    assert!(wallet.check_budget_exceedances(&user).expect("check").is_empty());
    spend(&wallet, &user, "Food", 5.0, today);
    assert_eq!(sink.alerts().len(), 1);
}

#[test]
fn category_overage_uses_hashed_identifier() {
    let today = date(2026, 10, 19);
    let (wallet, _) = wallet_on(today);
    let user = Username::new("ben");
    wallet
        .save_category_budget(&user, "Food", 200.0)
        .expect("category budget");
    spend(&wallet, &user, "Food", 120.0, today);

    let alerts = wallet
        .add_expense(&user, ExpenseDraft::new("Dinner", "Food", 130.0, today))
        .expect("add expense")
        .alerts;
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, CATEGORY_NOTIFICATION_BASE_ID + category_hash("Food"));
    assert_eq!(alerts[0].dimension, AlertDimension::Category("Food".into()));
    assert_eq!(alerts[0].overage, 50.0);
    assert_eq!(alerts[0].body, "You've exceeded your Food budget by $50.00");
}

#[test]
fn resaving_a_budget_rearms_exactly_one_alert_per_save() {
    let today = date(2026, 10, 19);
    let (wallet, sink) = wallet_on(today);
    let user = Username::new("cyd");
    spend(&wallet, &user, "Bills", 600.0, today);

    assert_eq!(wallet.save_monthly_budget(&user, 500.0).expect("save").len(), 1);
    assert_eq!(wallet.save_monthly_budget(&user, 500.0).expect("save").len(), 1);
    assert!(wallet.check_budget_exceedances(&user).expect("check").is_empty());
    assert_eq!(sink.alerts().len(), 2);
}

#[test]
fn category_save_only_rearms_that_category() {
    let today = date(2026, 10, 19);
    let (wallet, _) = wallet_on(today);
    let user = Username::new("dov");
    wallet.save_monthly_budget(&user, 100.0).expect("save");
    wallet.save_category_budget(&user, "Food", 50.0).expect("save");
    let first = wallet
        .add_expense(&user, ExpenseDraft::new("Feast", "Food", 150.0, today))
        .expect("add")
        .alerts;
    assert_eq!(first.len(), 2);

    let rearmed = wallet.save_category_budget(&user, "Food", 60.0).expect("save");
    assert_eq!(rearmed.len(), 1);
    assert_eq!(rearmed[0].dimension, AlertDimension::Category("Food".into()));
}

#[test]
fn ids_grow_monotonically_and_missing_deletes_are_noops() {
    let today = date(2026, 10, 19);
    let (wallet, _) = wallet_on(today);
    let user = Username::new("eve");
    for title in ["one", "two", "three"] {
        wallet
            .add_expense(&user, ExpenseDraft::new(title, "Food", 1.0, today))
            .expect("add");
    }
    let ids: Vec<_> = wallet.expenses(&user).expect("list").iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    assert!(wallet.delete_expense(&user, 2).expect("delete").value);
    let before = wallet.expenses(&user).expect("list");
    assert!(!wallet.delete_expense(&user, 2).expect("delete").value);
    assert!(!wallet.delete_expense(&user, 77).expect("delete").value);
    assert_eq!(wallet.expenses(&user).expect("list"), before);

    let added = wallet
        .add_expense(&user, ExpenseDraft::new("four", "Food", 1.0, today))
        .expect("add");
    assert_eq!(added.value.id, 4);
}

#[test]
fn per_category_spending_sums_to_monthly_total() {
    let today = date(2026, 10, 19);
    let (wallet, _) = wallet_on(today);
    let user = Username::new("fin");
    let categories = ["Food", "Transport", "Bills", "Entertainment", "Rent"];
    for (idx, amount) in [12.5, 3.2, 99.99, 41.0, 0.01, 7.77, 250.0].iter().enumerate() {
        spend(&wallet, &user, categories[idx % categories.len()], *amount, today);
    }
    spend(&wallet, &user, "Food", 1000.0, date(2026, 9, 30));

    let snapshot = wallet.spending(&user).expect("spending");
    let summed: f64 = snapshot.per_category.values().sum();
    assert!((summed - snapshot.total).abs() < 1e-9);
    assert!(snapshot.total < 1000.0);
}

#[test]
fn switching_users_isolates_their_data() {
    let today = date(2026, 10, 19);
    let (wallet, _) = wallet_on(today);
    assert_eq!(wallet.current_username().expect("user").as_str(), DEFAULT_USERNAME);

    let gia = wallet.sign_up(sign_up_form("gia")).expect("sign up");
    let user = wallet.current_username().expect("user");
    assert_eq!(user, gia.username);
    spend(&wallet, &user, "Food", 20.0, today);
    wallet.save_monthly_budget(&user, 300.0).expect("budget");

    let hal = wallet.sign_up(sign_up_form("hal")).expect("sign up");
    let user = wallet.current_username().expect("user");
    assert_eq!(user, hal.username);
    assert!(wallet.expenses(&user).expect("list").is_empty());
    assert_eq!(wallet.monthly_budget(&user).expect("budget"), 0.0);
    assert_eq!(wallet.spending(&user).expect("spending").total, 0.0);

    wallet.switch_user(&gia).expect("switch");
    let user = wallet.current_username().expect("user");
    assert_eq!(wallet.expenses(&user).expect("list").len(), 1);
}

#[test]
fn renaming_a_user_migrates_every_domain() {
    let today = date(2026, 10, 19);
    let (wallet, _) = wallet_on(today);
    let ivo = wallet.sign_up(sign_up_form("ivo")).expect("sign up");
    spend(&wallet, &ivo.username, "Food", 300.0, today);
    wallet
        .save_category_budget(&ivo.username, "Food", 100.0)
        .expect("budget");

    let outcome = wallet
        .update_profile(
            &ivo,
            ProfileUpdate {
                username: "ivan".into(),
                email: ivo.email.clone(),
                phone: String::new(),
            },
        )
        .expect("update");
    assert!(outcome.requires_relogin());
    assert_eq!(wallet.current_user().expect("session"), None);

    let renamed = Username::new("ivan");
    assert_eq!(wallet.expenses(&renamed).expect("list").len(), 1);
    assert_eq!(wallet.category_budgets(&renamed).expect("budgets")["Food"], 100.0);
    assert!(wallet
        .notification_state(&renamed)
        .expect("state")
        .is_category_notified("Food"));
    assert!(wallet.expenses(&ivo.username).expect("list").is_empty());

    let user = wallet.log_in(&ivo.email, "secret1").expect("log in");
    assert_eq!(user.username, renamed);
}

#[test]
fn month_rollover_rearms_alerts() {
    let user = Username::new("jem");
    let (mut wallet, sink) = wallet_on(date(2026, 10, 19));
    wallet.save_monthly_budget(&user, 50.0).expect("budget");
    spend(&wallet, &user, "Food", 80.0, date(2026, 10, 19));
    assert_eq!(sink.alerts().len(), 1);

    wallet.set_clock(Arc::new(FixedClock::new(date(2026, 11, 2))));
    spend(&wallet, &user, "Food", 80.0, date(2026, 11, 2));
    assert_eq!(sink.alerts().len(), 2);

    wallet.set_settings(WalletSettings {
        auto_month_rollover: false,
        ..WalletSettings::default()
    });
    wallet.set_clock(Arc::new(FixedClock::new(date(2026, 12, 1))));
    spend(&wallet, &user, "Food", 80.0, date(2026, 12, 1));
    assert_eq!(sink.alerts().len(), 2);

    wallet.reset_monthly_notifications(&user).expect("reset");
    assert_eq!(wallet.check_budget_exceedances(&user).expect("check").len(), 1);
}

#[test]
fn writes_publish_change_events() {
    let today = date(2026, 10, 19);
    let (wallet, _) = wallet_on(today);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    wallet.feed().subscribe(move |event| {
        if let Ok(mut events) = log.lock() {
            events.push(event.clone());
        }
    });

    let user = Username::new("kai");
    spend(&wallet, &user, "Food", 5.0, today);
    wallet.save_monthly_budget(&user, 10.0).expect("budget");
    wallet.reset_monthly_notifications(&user).expect("reset");

    let events = seen.lock().expect("events").clone();
    assert_eq!(
        events,
        vec![
            WalletEvent::ExpensesChanged(user.clone()),
            WalletEvent::BudgetChanged(user.clone()),
            WalletEvent::NotificationsReset(user),
        ]
    );
}

#[test]
fn overview_and_monthly_change() {
    let today = date(2026, 10, 19);
    let (wallet, _) = wallet_on(today);
    let user = Username::new("lou");
    spend(&wallet, &user, "Food", 200.0, date(2026, 9, 10));
    spend(&wallet, &user, "Food", 50.0, today);
    spend(&wallet, &user, "Rent", 100.0, today);

    let overview = wallet.overview(&user).expect("overview");
    assert_eq!(overview.total_all_time, 350.0);
    assert_eq!(overview.total_this_month, 150.0);
    assert_eq!(overview.item_count, 3);

    let change = wallet.monthly_change(&user).expect("change");
    assert_eq!(change.percent_change, Some(-25.0));

    wallet.save_category_budget(&user, "Food", 60.0).expect("budget");
    let budget = wallet.budget_overview(&user).expect("budget overview");
    assert!(budget.categories[0].status.percent_used().is_some());
}
