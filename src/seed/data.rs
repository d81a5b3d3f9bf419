use chrono::Utc;

use crate::model::{
    GreetingLink, GreetingNative, GreetingRecord, ResourceId, StorageKey, GREETING_LINK_TYPE,
};
use crate::store::traits::GreetingStore;

/// One bootstrap greeting as seen from one language.
struct SeedGreeting {
    resource: &'static str,
    language_tag: &'static str,
    greeting: &'static str,
    language: &'static str,
    country: &'static str,
    native: (&'static str, &'static str),
    title: &'static str,
}

const SEED_GREETINGS: &[SeedGreeting] = &[
    SeedGreeting {
        resource: "hallo",
        language_tag: "da",
        greeting: "Hallo!",
        language: "Dansk",
        country: "Danmark",
        native: ("Dansk", "Danmark"),
        title: "Dansk Hilsen Hallo",
    },
    SeedGreeting {
        resource: "hallo",
        language_tag: "en",
        greeting: "Hallo!",
        language: "Dansk",
        country: "Danmark",
        native: ("Danish", "Denmark"),
        title: "Danish Greeting Hallo",
    },
    SeedGreeting {
        resource: "hello",
        language_tag: "da",
        greeting: "Hello!",
        language: "English",
        country: "England",
        native: ("Engelsk", "England"),
        title: "Engelsk Hilsen Hello",
    },
    SeedGreeting {
        resource: "hello",
        language_tag: "en",
        greeting: "Hello!",
        language: "English",
        country: "England",
        native: ("English", "England"),
        title: "English Greeting Hello",
    },
];

/// Bootstrap the Danish and English greetings in both languages.
///
/// Only an empty store is seeded. Returns the number of records written.
pub async fn load_seed_data<S: GreetingStore>(store: &S) -> usize {
    if !store.is_empty().await {
        log::info!("store already holds greetings, skipping bootstrap");
        return 0;
    }

    let seen = Utc::now();
    let mut loaded = 0;
    for seed in SEED_GREETINGS {
        let resource = match ResourceId::parse(seed.resource) {
            Ok(resource) => resource,
            Err(err) => {
                log::warn!("skipping seed greeting {}: {}", seed.resource, err);
                continue;
            }
        };
        let link = GreetingLink::new(format!("/greetings/{}", resource), seed.title)
            .with_media_type(GREETING_LINK_TYPE)
            .with_language_tag(seed.language_tag)
            .with_seen_at(seen);
        let record = GreetingRecord::new(
            seed.greeting,
            seed.language,
            seed.country,
            GreetingNative::new(seed.native.0, seed.native.1),
            link,
        );
        store
            .put(StorageKey::new(&resource, seed.language_tag), record)
            .await;
        loaded += 1;
    }

    log::info!("default data bootstrap activated with {} greetings", loaded);
    loaded
}
