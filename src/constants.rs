/// Physicians offered in the appointment and registration dropdowns.
pub const DOCTORS: &[&str] = &[
    "John Green",
    "Leila Cameron",
    "David Livingston",
    "Evan Peter",
    "Jane Powell",
    "Alex Ramirez",
    "Jasmine Lee",
    "Alyana Cruz",
    "Hardik Sharma",
];

pub const GENDER_OPTIONS: &[&str] = &["male", "female", "other"];

pub const IDENTIFICATION_TYPES: &[&str] = &[
    "Birth Certificate",
    "Driver's License",
    "Medical Insurance Card/Policy",
    "Military ID Card",
    "National Identity Card",
    "Passport",
    "Resident Alien Card (Green Card)",
    "Social Security Card",
    "State ID Card",
    "Student ID Card",
    "Voter ID Card",
];
