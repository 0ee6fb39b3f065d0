//! Detail page of a single user.

use crate::{UserId, UserRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSection {
    pub email: String,
    pub phone: String,
    pub website: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanySection {
    pub name: String,
    pub catch_phrase: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSection {
    pub street: String,
    pub suite: String,
    /// `"city, zipcode"`
    pub locality: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetail {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub contact: ContactSection,
    pub company: CompanySection,
    pub address: AddressSection,
}

impl From<&UserRecord> for UserDetail {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            contact: ContactSection {
                email: user.email.clone(),
                phone: user.phone.clone(),
                website: user.website.clone(),
            },
            company: CompanySection {
                name: user.company.name.clone(),
                catch_phrase: user.company.catch_phrase.clone(),
            },
            address: AddressSection {
                street: user.address.street.clone(),
                suite: user.address.suite.clone(),
                locality: locality(&user.address.city, &user.address.zipcode),
            },
        }
    }
}

fn locality(city: &str, zipcode: &str) -> String {
    match (city.is_empty(), zipcode.is_empty()) {
        (false, false) => format!("{city}, {zipcode}"),
        (false, true) => city.to_owned(),
        (true, _) => zipcode.to_owned(),
    }
}
