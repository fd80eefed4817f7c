use crate::api::{Card, Error};

/// Persists cards on behalf of an editing session
///
/// The session does not wait on or react to the result beyond logging it:
/// local state stays as the user left it even if the store refuses a record.
pub trait CardStore {
    fn update(&mut self, card: Card) -> Result<(), Error>;
    fn delete(&mut self, card: &Card) -> Result<(), Error>;
}

impl<T: CardStore + ?Sized> CardStore for &mut T {
    fn update(&mut self, card: Card) -> Result<(), Error> {
        (**self).update(card)
    }

    fn delete(&mut self, card: &Card) -> Result<(), Error> {
        (**self).delete(card)
    }
}

impl<T: CardStore + ?Sized> CardStore for Box<T> {
    fn update(&mut self, card: Card) -> Result<(), Error> {
        (**self).update(card)
    }

    fn delete(&mut self, card: &Card) -> Result<(), Error> {
        (**self).delete(card)
    }
}

/// Told when the editing surface should be dismissed
pub trait CardCloser {
    fn on_close(&mut self);
}

impl<F: FnMut()> CardCloser for F {
    fn on_close(&mut self) {
        self()
    }
}
