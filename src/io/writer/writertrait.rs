use crate::error::Error;

pub trait WriterTrait {
    type Item;

    fn write(&mut self, vals: Vec<Self::Item>) -> Result<(), Error>;
    fn write_single(&mut self, val: &Self::Item) -> Result<(), Error>;
    fn flush(&mut self) -> Result<(), Error>;
}
