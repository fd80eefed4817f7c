use std::collections::{btree_map, BTreeMap, HashMap};

use cardboard_client::{
    api::{
        self, AuthContext, AuthToken, Card, CardId, CardInList, Error, NewSession, NewUser, Time,
        User, UserDirectory, UserId, Uuid,
    },
    CardStore,
};
use chrono::{Duration, Utc};

/// In-memory board: users, their login sessions and the cards they own
pub struct MockServer {
    users: BTreeMap<UserId, DbUser>,
    cards: BTreeMap<CardId, StoredCard>,
    session_ttl: Duration,
}

#[derive(Debug)]
struct DbUser {
    name: String,
    pass_hash: String,
    /// Expiry time of each login session, pruned on login
    sessions: HashMap<AuthToken, Time>,
}

#[derive(Debug)]
struct StoredCard {
    owner: UserId,
    list_title: String,
    card: Card,
}

impl MockServer {
    pub fn new(session_ttl: Duration) -> MockServer {
        MockServer {
            users: BTreeMap::new(),
            cards: BTreeMap::new(),
            session_ttl,
        }
    }

    /// Return the current number of users
    pub fn test_num_users(&self) -> usize {
        self.users.len()
    }

    /// Return the current number of login sessions, expired ones included
    pub fn test_num_sessions(&self) -> usize {
        self.users.values().map(|u| u.sessions.len()).sum()
    }

    /// Return the current number of cards
    pub fn test_num_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn admin_create_user(&mut self, u: NewUser) -> Result<(), Error> {
        u.validate()?;

        if self.users.values().any(|db| db.name == u.name) {
            return Err(Error::NameAlreadyUsed(u.name));
        }

        match self.users.entry(u.id) {
            btree_map::Entry::Occupied(_) => Err(Error::UuidAlreadyUsed(u.id.0)),
            btree_map::Entry::Vacant(entry) => {
                tracing::info!(user = ?u.id, name = %u.name, "created user");
                entry.insert(DbUser {
                    name: u.name,
                    pass_hash: u.initial_password_hash,
                    sessions: HashMap::new(),
                });
                Ok(())
            }
        }
    }

    pub fn auth(&mut self, s: NewSession) -> Result<AuthToken, Error> {
        s.validate()?;
        let now = Utc::now();
        for u in self.users.values_mut() {
            if u.name == s.user {
                if !bcrypt::verify(&s.password, &u.pass_hash).unwrap_or(false) {
                    return Err(Error::PermissionDenied);
                }
                u.sessions.retain(|_, expires| *expires > now);
                let tok = AuthToken(Uuid::new_v4());
                tracing::debug!(user = %u.name, device = %s.device, "opened login session");
                u.sessions.insert(tok, now + self.session_ttl);
                return Ok(tok);
            }
        }
        Err(Error::PermissionDenied)
    }

    pub fn unauth(&mut self, tok: AuthToken) -> Result<(), Error> {
        for u in self.users.values_mut() {
            if u.sessions.remove(&tok).is_some() {
                return Ok(());
            }
        }
        Err(Error::PermissionDenied)
    }

    pub fn whoami(&self, ctx: &AuthContext) -> Result<User, Error> {
        Ok(api::resolve_user(ctx, self)?)
    }

    pub fn create_card(&mut self, user: UserId, c: CardInList) -> Result<(), Error> {
        api::validate_bounded("list", &c.list_title, api::TITLE_MAX_LEN)?;
        c.card.validate()?;
        match self.cards.entry(c.card.id) {
            btree_map::Entry::Occupied(_) => Err(Error::UuidAlreadyUsed(c.card.id.0)),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(StoredCard {
                    owner: user,
                    list_title: c.list_title,
                    card: c.card,
                });
                Ok(())
            }
        }
    }

    fn owned_mut(&mut self, user: UserId, id: CardId) -> Result<&mut StoredCard, Error> {
        let stored = self
            .cards
            .get_mut(&id)
            .ok_or(Error::CardNotFound(id.0))?;
        if stored.owner != user {
            return Err(Error::PermissionDenied);
        }
        Ok(stored)
    }

    pub fn fetch_card(&self, user: UserId, id: CardId) -> Result<CardInList, Error> {
        let stored = self.cards.get(&id).ok_or(Error::CardNotFound(id.0))?;
        if stored.owner != user {
            return Err(Error::PermissionDenied);
        }
        Ok(CardInList {
            list_title: stored.list_title.clone(),
            card: stored.card.clone(),
        })
    }

    pub fn update_card(&mut self, user: UserId, card: Card) -> Result<(), Error> {
        card.validate()?;
        let stored = self.owned_mut(user, card.id)?;
        tracing::debug!(card = ?card.id, "updating card");
        stored.card = card;
        Ok(())
    }

    pub fn delete_card(&mut self, user: UserId, id: CardId) -> Result<(), Error> {
        self.owned_mut(user, id)?;
        tracing::debug!(card = ?id, "deleting card");
        self.cards.remove(&id);
        Ok(())
    }

    /// A `CardStore` acting on this board as `user`
    pub fn store_for(&mut self, user: UserId) -> MockStore<'_> {
        MockStore { server: self, user }
    }
}

impl UserDirectory for MockServer {
    fn session(&self, token: AuthToken) -> Option<(UserId, Time)> {
        self.users
            .iter()
            .find_map(|(id, u)| u.sessions.get(&token).map(|expires| (*id, *expires)))
    }

    fn user(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|u| User {
            id,
            name: u.name.clone(),
        })
    }
}

pub struct MockStore<'a> {
    server: &'a mut MockServer,
    user: UserId,
}

impl CardStore for MockStore<'_> {
    fn update(&mut self, card: Card) -> Result<(), Error> {
        self.server.update_card(self.user, card)
    }

    fn delete(&mut self, card: &Card) -> Result<(), Error> {
        self.server.delete_card(self.user, card.id)
    }
}
