//! Static faculty contact directory.

use serde::Serialize;

use super::Error;

/// Read-only faculty contact entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FacultyContact {
    pub id: u32,
    pub name: &'static str,
    pub department: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub designation: &'static str,
}

static DIRECTORY: [FacultyContact; 5] = [
    FacultyContact {
        id: 1,
        name: "Dr. Rajesh Kumar",
        department: "Computer Science",
        email: "rajesh.kumar@college.edu",
        phone: "+91 9876543210",
        designation: "Professor",
    },
    FacultyContact {
        id: 2,
        name: "Dr. Priya Sharma",
        department: "Mathematics",
        email: "priya.sharma@college.edu",
        phone: "+91 8765432109",
        designation: "Associate Professor",
    },
    FacultyContact {
        id: 3,
        name: "Dr. Amit Patel",
        department: "Physics",
        email: "amit.patel@college.edu",
        phone: "+91 7654321098",
        designation: "Professor",
    },
    FacultyContact {
        id: 4,
        name: "Dr. Sneha Gupta",
        department: "Chemistry",
        email: "sneha.gupta@college.edu",
        phone: "+91 6543210987",
        designation: "Assistant Professor",
    },
    FacultyContact {
        id: 5,
        name: "Dr. Vikram Singh",
        department: "Electronics",
        email: "vikram.singh@college.edu",
        phone: "+91 9432109876",
        designation: "Professor",
    },
];

/// Every faculty contact, ordered by id.
#[must_use]
pub fn faculty_directory() -> &'static [FacultyContact] {
    &DIRECTORY
}

/// Look up a contact by numeric id.
///
/// # Examples
/// ```
/// use helpdesk::domain::faculty_contact;
///
/// assert_eq!(faculty_contact(3).expect("known id").department, "Physics");
/// assert!(faculty_contact(42).is_err());
/// ```
pub fn faculty_contact(id: u32) -> Result<&'static FacultyContact, Error> {
    DIRECTORY
        .iter()
        .find(|contact| contact.id == id)
        .ok_or_else(|| Error::not_found(format!("no faculty member with id {id}")))
}
