//! Relational adapter integration tests
//!
//! These tests run against a real database through SeaORM. They are marked
//! #[ignore] by default and should be run explicitly:
//!
//!   cargo test database -- --ignored
//!
//! Uses TEST_DATABASE_URL when set, otherwise an in-memory SQLite database.

use std::env;

use sea_orm::DatabaseConnection;

use super::*;
use crate::domain::entities::*;
use crate::domain::ports::Repository;
use crate::error::DomainError;

async fn get_test_db() -> DatabaseConnection {
    let url = env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    let db = connect(&url)
        .await
        .expect("Failed to connect to test database");
    create_schema(&db).await.expect("Failed to create schema");
    db
}

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

fn new_user(email: String) -> User {
    User::new(NewUser {
        first_name: "Db".to_string(),
        last_name: "Tester".to_string(),
        email,
        is_admin: false,
        password_hash: "hash".to_string(),
    })
    .unwrap()
}

fn new_place(owner_id: UserId, amenities: Vec<AmenityId>) -> Place {
    Place::new(NewPlace {
        owner_id,
        title: "Harbour View".to_string(),
        description: Some("Close to the water".to_string()),
        price: 120.5,
        latitude: 43.3,
        longitude: 5.4,
        amenities,
        reviews: vec![],
    })
    .unwrap()
}

mod user_repo_tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn create_and_find_user() {
        let db = get_test_db().await;
        let repo = DbUserRepository::new(db);

        let email = unique_email("find");
        let user = repo.add(new_user(email.clone())).await.unwrap();

        let found = repo.get(&user.id()).await.unwrap().unwrap();
        assert_eq!(found.email, email);
        assert_eq!(found.password_hash, "hash");

        let by_email = repo
            .get_by_attribute(&UserLookup::Email(email))
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id()), Some(user.id()));
    }

    #[tokio::test]
    #[ignore]
    async fn duplicate_email_is_rejected_by_storage() {
        let db = get_test_db().await;
        let repo = DbUserRepository::new(db);

        let email = unique_email("dup");
        repo.add(new_user(email.clone())).await.unwrap();
        let err = repo.add(new_user(email)).await.unwrap_err();

        assert!(matches!(err, DomainError::DuplicateEmail(_)));
    }

    #[tokio::test]
    #[ignore]
    async fn update_missing_user_is_none() {
        let db = get_test_db().await;
        let repo = DbUserRepository::new(db);

        let result = repo
            .update(&UserId::new(), &UserPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }
}

mod place_repo_tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn links_keep_their_order() {
        let db = get_test_db().await;
        let users = DbUserRepository::new(db.clone());
        let amenities = DbAmenityRepository::new(db.clone());
        let places = DbPlaceRepository::new(db);

        let owner = users.add(new_user(unique_email("owner"))).await.unwrap();
        let pool = amenities.add(Amenity::new("Pool").unwrap()).await.unwrap();
        let wifi = amenities.add(Amenity::new("Wi-Fi").unwrap()).await.unwrap();

        let place = places
            .add(new_place(owner.id(), vec![wifi.id(), pool.id()]))
            .await
            .unwrap();
        let stored = places.get(&place.id()).await.unwrap().unwrap();
        assert_eq!(stored.amenities, vec![wifi.id(), pool.id()]);

        let patch = PlacePatch {
            amenities: Some(vec![pool.id()]),
            ..Default::default()
        };
        let updated = places.update(&place.id(), &patch).await.unwrap().unwrap();
        assert_eq!(updated.amenities, vec![pool.id()]);
        assert_eq!(updated.title, "Harbour View");

        let owned = places
            .get_all_by_attribute(&PlaceLookup::Owner(owner.id()))
            .await
            .unwrap();
        assert_eq!(owned.len(), 1);
    }

    #[tokio::test]
    #[ignore]
    async fn delete_place() {
        let db = get_test_db().await;
        let users = DbUserRepository::new(db.clone());
        let places = DbPlaceRepository::new(db);

        let owner = users.add(new_user(unique_email("del"))).await.unwrap();
        let place = places.add(new_place(owner.id(), vec![])).await.unwrap();

        assert!(places.delete(&place.id()).await.unwrap());
        assert!(places.get(&place.id()).await.unwrap().is_none());
        assert!(!places.delete(&place.id()).await.unwrap());
    }
}

mod review_repo_tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn second_review_for_same_pair_is_rejected() {
        let db = get_test_db().await;
        let users = DbUserRepository::new(db.clone());
        let places = DbPlaceRepository::new(db.clone());
        let reviews = DbReviewRepository::new(db);

        let owner = users.add(new_user(unique_email("host"))).await.unwrap();
        let guest = users.add(new_user(unique_email("guest"))).await.unwrap();
        let place = places.add(new_place(owner.id(), vec![])).await.unwrap();

        let review = |text: &str| {
            Review::new(NewReview {
                place_id: place.id(),
                user_id: guest.id(),
                rating: RatingInput::Integer(4),
                text: text.to_string(),
            })
            .unwrap()
        };
        reviews.add(review("First")).await.unwrap();
        let err = reviews.add(review("Second")).await.unwrap_err();

        assert!(matches!(err, DomainError::DuplicateReview { .. }));
        let of_place = reviews
            .get_all_by_attribute(&ReviewLookup::Place(place.id()))
            .await
            .unwrap();
        assert_eq!(of_place.len(), 1);
        assert_eq!(of_place[0].rating, 4);
    }

    #[tokio::test]
    #[ignore]
    async fn review_links_append_and_remove() {
        let db = get_test_db().await;
        let users = DbUserRepository::new(db.clone());
        let places = DbPlaceRepository::new(db.clone());
        let reviews = DbReviewRepository::new(db);

        let owner = users.add(new_user(unique_email("host"))).await.unwrap();
        let place = places.add(new_place(owner.id(), vec![])).await.unwrap();

        let mut written = Vec::new();
        for prefix in ["first", "second", "third"] {
            let guest = users.add(new_user(unique_email(prefix))).await.unwrap();
            let review = reviews
                .add(
                    Review::new(NewReview {
                        place_id: place.id(),
                        user_id: guest.id(),
                        rating: RatingInput::Integer(5),
                        text: "Lovely".to_string(),
                    })
                    .unwrap(),
                )
                .await
                .unwrap();
            places
                .update(&place.id(), &PlacePatch::link_review(review.id()))
                .await
                .unwrap();
            written.push(review.id());
        }
        let stored = places.get(&place.id()).await.unwrap().unwrap();
        assert_eq!(stored.reviews, written);

        places
            .update(&place.id(), &PlacePatch::unlink_review(written[1]))
            .await
            .unwrap();
        let stored = places.get(&place.id()).await.unwrap().unwrap();
        assert_eq!(stored.reviews, vec![written[0], written[2]]);
    }
}
