use jiff::Timestamp;
use jornada_core::bookmark::{plan_toggle, toggle_target, ToggleOutcome};
use jornada_core::models::catalog::{CatalogCourse, CatalogJourney};
use jornada_core::models::enrollment::{Enrollment, Percent, StudentCourse, StudentJourney};
use jornada_core::models::step_ref::CourseStepRef;

fn grammar_basics() -> CatalogCourse {
    CatalogCourse {
        id: "c1".to_string(),
        name: "Grammar Basics".to_string(),
        description: Some("Tenses and word order".to_string()),
        level: None,
        duration_minutes: 60,
        first_lesson_label: None,
        cover_url: None,
        company_logo_url: None,
        active: true,
    }
}

#[test]
fn first_toggle_creates_bookmarked_enrollment() {
    let course = grammar_basics();
    let change = plan_toggle::<StudentCourse>(None, "s1", &course, Timestamp::now());

    assert_eq!(change.outcome, ToggleOutcome::Created);
    assert!(change.record.bookmarked);
    assert_eq!(change.record.progress_percent, Percent::ZERO);
    assert_eq!(change.record.study_time_minutes, 0);
    assert_eq!(change.record.student_id, "s1");
    assert_eq!(change.record.course_id, "c1");
    assert_eq!(change.record.title.as_deref(), Some("Grammar Basics"));
    assert_eq!(change.record.course, course);
}

#[test]
fn toggling_twice_restores_original_value() {
    let course = grammar_basics();
    let created = plan_toggle::<StudentCourse>(None, "s1", &course, Timestamp::now()).record;

    let off = plan_toggle(Some(&created), "s1", &course, Timestamp::now());
    assert_eq!(off.outcome, ToggleOutcome::Updated);
    assert!(!off.record.bookmarked);
    assert_eq!(off.record.id, created.id);

    let on = plan_toggle(Some(&off.record), "s1", &course, Timestamp::now());
    assert_eq!(on.record.bookmarked, created.bookmarked);
}

#[test]
fn toggle_preserves_progress() {
    let course = grammar_basics();
    let mut existing = StudentCourse::enroll("s1", &course, Timestamp::now());
    existing.progress_percent = Percent::new(35).expect("valid percent");
    existing.study_time_minutes = 42;

    let change = plan_toggle(Some(&existing), "s1", &course, Timestamp::now());
    assert_eq!(change.record.progress_percent, existing.progress_percent);
    assert_eq!(change.record.study_time_minutes, 42);
}

#[test]
fn journey_enrollment_snapshots_steps() {
    let journey = CatalogJourney {
        id: "j1".to_string(),
        title: "Business English".to_string(),
        description: Some("From email to meetings".to_string()),
        cover_url: Some("https://cdn.example.com/j1.jpg".to_string()),
        duration_hours: 12,
        number_of_steps: 2,
        course_steps: vec![CourseStepRef {
            id: Some("c1".to_string()),
            title: Some("Grammar Basics".to_string()),
            description: None,
            duration_minutes: Some(60),
        }],
        journey_steps: Vec::new(),
        active: true,
    };

    let change = plan_toggle::<StudentJourney>(None, "s1", &journey, Timestamp::now());
    let record = change.record;
    assert_eq!(record.current_step, 0);
    assert_eq!(record.number_of_steps, 2);
    assert_eq!(record.course_steps, journey.course_steps);
    assert_eq!(record.cover_url, journey.cover_url);
    assert!(record.validate().is_ok());
}

#[test]
fn toggle_target_reflects_intent() {
    let course = grammar_basics();
    let mut existing = StudentCourse::enroll("s1", &course, Timestamp::now());
    assert!(toggle_target::<StudentCourse>(None));
    assert!(!toggle_target(Some(&existing)));
    existing.bookmarked = false;
    assert!(toggle_target(Some(&existing)));
}

#[test]
fn percent_rejects_out_of_range() {
    assert!(Percent::new(101).is_err());
    assert!(serde_json::from_str::<Percent>("150").is_err());
    assert_eq!(serde_json::from_str::<Percent>("100").expect("valid").get(), 100);
}

#[test]
fn percent_is_a_bare_number_on_the_wire() {
    let pct = Percent::new(42).expect("in range");
    assert_eq!(serde_json::to_string(&pct).expect("serialize"), "42");
    assert!(serde_json::from_str::<Percent>("\"42\"").is_err());
    assert!(serde_json::from_str::<Percent>("-1").is_err());
}

#[test]
fn journey_step_beyond_total_fails_validation() {
    let journey = CatalogJourney {
        id: "j1".to_string(),
        title: "Short".to_string(),
        description: None,
        cover_url: None,
        duration_hours: 1,
        number_of_steps: 1,
        course_steps: Vec::new(),
        journey_steps: Vec::new(),
        active: true,
    };
    let mut record = StudentJourney::enroll("s1", &journey, Timestamp::now());
    record.current_step = 2;
    assert!(record.validate().is_err());
    assert_eq!(record.progress_percent().get(), 100);
}
