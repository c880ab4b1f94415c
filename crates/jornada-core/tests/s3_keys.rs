use jornada_core::s3_keys;

#[test]
fn enrollment_keys_are_unique_per_pair() {
    assert_eq!(s3_keys::student_course("s1", "c1"), "students/s1/courses/c1.json");
    assert_eq!(s3_keys::student_journey("s1", "j1"), "students/s1/journeys/j1.json");
    assert_ne!(s3_keys::student_course("s1", "c1"), s3_keys::student_course("s2", "c1"));
    assert!(s3_keys::student_course("s1", "c1").starts_with(&s3_keys::student_courses_prefix("s1")));
}

#[test]
fn catalog_keys_live_under_their_prefix() {
    assert!(s3_keys::catalog_course("c1").starts_with(s3_keys::CATALOG_COURSES_PREFIX));
    assert!(s3_keys::catalog_journey("j1").starts_with(s3_keys::CATALOG_JOURNEYS_PREFIX));
}

#[test]
fn ids_that_escape_their_segment_are_rejected() {
    assert!(s3_keys::check_id("c1").is_ok());
    assert!(s3_keys::check_id("").is_err());
    assert!(s3_keys::check_id("a/b").is_err());
    assert!(s3_keys::check_id("..").is_err());
}
