//! Reference course list.
//!
//! MIT undergraduate majors. Course subsets (6-1, 6-2, ...) are left out
//! since they change often; course 21 is split because its subsets differ
//! substantially from each other.

/// `(course number, course name)` pairs inserted by `mq init`.
pub const REFERENCE_COURSES: &[(&str, &str)] = &[
    ("1", "Civil and Environmental Engineering"),
    ("2", "Mechanical Engineering"),
    ("3", "Material Science and Engineering"),
    ("4", "Architecture"),
    ("6", "Electrical Engineering and Computer Science"),
    ("7", "Biology"),
    ("8", "Physics"),
    ("9", "Brain and Cognitive Sciences"),
    ("10", "Chemical Engineering"),
    ("11", "Urban Studies and Planning"),
    ("12", "Earth, Atmospheric, and Planetary Sciences"),
    ("14", "Economics"),
    ("15", "Management"),
    ("16", "Aeronautics and Astronautics"),
    ("17", "Political Science"),
    ("18", "Mathematics"),
    ("20", "Biological Engineering"),
    ("21A", "Anthropology"),
    ("21", "Humanities"),
    ("21L", "Literature"),
    ("21G", "Global Studies and Languages"),
    ("21M-1", "Music"),
    ("21M-2", "Theater Arts"),
    ("21W", "Comparative Media Studies / Writing"),
    ("21H", "History"),
    ("22", "Nuclear Science and Engineering"),
    ("24", "Linguistics and Philosophy"),
    ("CMS", "Comparative Media Studies"),
    ("STS", "Science, Technology, and Society"),
];
