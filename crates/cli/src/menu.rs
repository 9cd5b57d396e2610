//! Interactive menu loop.

use std::io::{self, BufRead, Write};

use tracing::{debug, info};

use stockctl_products::{Product, ProductService, ProductStore, ServiceError};

use crate::input::{ParseError, Prompt, parse_decimal, parse_integer};

/// The finite set of actions the menu offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Create,
    List,
    Update,
    Delete,
    Exit,
}

impl MenuCommand {
    pub const ALL: [MenuCommand; 5] = [
        MenuCommand::Create,
        MenuCommand::List,
        MenuCommand::Update,
        MenuCommand::Delete,
        MenuCommand::Exit,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MenuCommand::Create => "1",
            MenuCommand::List => "2",
            MenuCommand::Update => "3",
            MenuCommand::Delete => "4",
            MenuCommand::Exit => "5",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuCommand::Create => "Create new product",
            MenuCommand::List => "List all products",
            MenuCommand::Update => "Update product",
            MenuCommand::Delete => "Delete product",
            MenuCommand::Exit => "Exit",
        }
    }

    pub fn from_choice(choice: &str) -> Option<Self> {
        let choice = choice.trim();
        Self::ALL.into_iter().find(|c| c.key() == choice)
    }
}

/// Whether the loop keeps going after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// One prompted number: parsed, rejected, or input ended.
enum Field<T> {
    Value(T),
    Invalid,
    Eof,
}

/// Menu loop over a product service and a reader/writer pair.
pub struct Menu<S, R, W> {
    service: ProductService<S>,
    prompt: Prompt<R, W>,
}

impl<S, R, W> Menu<S, R, W>
where
    S: ProductStore,
    R: BufRead,
    W: Write,
{
    pub fn new(service: ProductService<S>, reader: R, writer: W) -> Self {
        Self {
            service,
            prompt: Prompt::new(reader, writer),
        }
    }

    pub fn into_parts(self) -> (ProductService<S>, W) {
        (self.service, self.prompt.into_writer())
    }

    /// Run until the user exits or input ends. Operation failures are
    /// printed and never end the loop; only I/O errors on the console do.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.show_options()?;
            let Some(choice) = self.prompt.ask("Choose an option: ")? else {
                debug!("input closed, leaving menu");
                return Ok(());
            };

            let flow = match MenuCommand::from_choice(&choice) {
                Some(command) => self.dispatch(command)?,
                None => {
                    self.prompt.say("Invalid option. Try again.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Stop {
                return Ok(());
            }
        }
    }

    fn show_options(&mut self) -> io::Result<()> {
        self.prompt.say("\nMenu:")?;
        for command in MenuCommand::ALL {
            self.prompt
                .say(format_args!("{}. {}", command.key(), command.label()))?;
        }
        Ok(())
    }

    fn dispatch(&mut self, command: MenuCommand) -> io::Result<Flow> {
        debug!(?command, "menu command selected");
        match command {
            MenuCommand::Create => self.create(),
            MenuCommand::List => self.list(),
            MenuCommand::Update => self.update(),
            MenuCommand::Delete => self.delete(),
            MenuCommand::Exit => {
                self.prompt.say("Goodbye.")?;
                Ok(Flow::Stop)
            }
        }
    }

    fn create(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt.ask("Enter the product name: ")? else {
            return Ok(Flow::Stop);
        };
        let quantity = self.read_number("Enter the product quantity: ", parse_integer)?;
        let price = self.read_number("Enter the product price: ", parse_decimal)?;

        let (quantity, price) = match (quantity, price) {
            (Field::Eof, _) | (_, Field::Eof) => return Ok(Flow::Stop),
            (Field::Value(q), Field::Value(p)) => (q, p),
            _ => return Ok(Flow::Continue),
        };

        match self.service.create_product(&name, quantity, price) {
            Ok(id) => {
                info!(%id, "product created from menu");
                self.prompt
                    .say(format_args!("Product created with ID {id}."))?;
            }
            Err(ServiceError::Conflict(_)) => {
                self.prompt
                    .say(format_args!("Error: a product named '{name}' already exists."))?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn list(&mut self) -> io::Result<Flow> {
        match self.service.list_products() {
            Ok(products) if products.is_empty() => {
                self.prompt.say("No products registered.")?;
            }
            Ok(products) => {
                self.prompt.say("Products in stock:")?;
                for product in &products {
                    self.prompt.say(format_product(product))?;
                }
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn update(&mut self) -> io::Result<Flow> {
        let id = self.read_number("Enter the ID of the product to update: ", parse_integer)?;
        let quantity = self.read_number("Enter the new quantity: ", parse_integer)?;
        let price = self.read_number("Enter the new price: ", parse_decimal)?;

        let (id, quantity, price) = match (id, quantity, price) {
            (Field::Eof, _, _) | (_, Field::Eof, _) | (_, _, Field::Eof) => {
                return Ok(Flow::Stop);
            }
            (Field::Value(i), Field::Value(q), Field::Value(p)) => (i, q, p),
            _ => return Ok(Flow::Continue),
        };

        match self.service.update_product(id, quantity, price) {
            Ok(()) => {
                self.prompt.say("Product updated.")?;
                match self.service.get_product(id) {
                    Ok(product) => self.prompt.say(format_product(&product))?,
                    Err(err) => self.report(&err)?,
                }
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> io::Result<Flow> {
        let id = match self.read_number("Enter the ID of the product to delete: ", parse_integer)? {
            Field::Value(id) => id,
            Field::Invalid => return Ok(Flow::Continue),
            Field::Eof => return Ok(Flow::Stop),
        };

        match self.service.delete_product(id) {
            Ok(()) => self.prompt.say("Product deleted.")?,
            Err(err) => self.report(&err)?,
        }
        Ok(Flow::Continue)
    }

    fn read_number<T>(
        &mut self,
        message: &str,
        parse: fn(&str) -> Result<T, ParseError>,
    ) -> io::Result<Field<T>> {
        let Some(raw) = self.prompt.ask(message)? else {
            return Ok(Field::Eof);
        };
        match parse(&raw) {
            Ok(value) => Ok(Field::Value(value)),
            Err(err) => {
                self.prompt.say(format_args!("Error: {err}."))?;
                Ok(Field::Invalid)
            }
        }
    }

    fn report(&mut self, err: &ServiceError) -> io::Result<()> {
        self.prompt.say(describe(err))
    }
}

/// One listing line.
pub fn format_product(product: &Product) -> String {
    format!(
        "ID: {} | Name: {} | Quantity: {} | Price: {:.2}",
        product.id_typed(),
        product.name(),
        product.quantity(),
        product.price()
    )
}

/// User-facing message for a failed operation.
pub fn describe(err: &ServiceError) -> String {
    match err {
        ServiceError::Validation(msg) => format!("Error: invalid input ({msg})."),
        ServiceError::Conflict(msg) => format!("Error: {msg}."),
        ServiceError::NotFound => "Error: product not found.".to_string(),
        ServiceError::StoreUnavailable(msg) => format!("Database error: {msg}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockctl_products::{
        InMemoryProductStore, NewProduct, Price, ProductId, Quantity, StoreError, StoreResult,
    };

    /// Store whose every call fails as if the database file were unreachable.
    struct BrokenStore;

    impl BrokenStore {
        fn fail<T>() -> StoreResult<T> {
            Err(StoreError::unavailable("unable to open database file"))
        }
    }

    impl ProductStore for BrokenStore {
        fn initialize(&self) -> StoreResult<()> {
            Self::fail()
        }
        fn insert(&self, _: &NewProduct) -> StoreResult<ProductId> {
            Self::fail()
        }
        fn select_all(&self) -> StoreResult<Vec<Product>> {
            Self::fail()
        }
        fn select_by_id(&self, _: ProductId) -> StoreResult<Option<Product>> {
            Self::fail()
        }
        fn update_quantity_and_price(&self, _: ProductId, _: Quantity, _: Price) -> StoreResult<u64> {
            Self::fail()
        }
        fn delete_by_id(&self, _: ProductId) -> StoreResult<u64> {
            Self::fail()
        }
    }

    fn run_session(script: &str) -> (ProductService<InMemoryProductStore>, String) {
        run_with(ProductService::new(InMemoryProductStore::new()), script)
    }

    fn run_with(
        service: ProductService<InMemoryProductStore>,
        script: &str,
    ) -> (ProductService<InMemoryProductStore>, String) {
        let mut menu = Menu::new(service, script.as_bytes(), Vec::new());
        menu.run().unwrap();
        let (service, out) = menu.into_parts();
        (service, String::from_utf8(out).unwrap())
    }

    #[test]
    fn choices_map_to_commands() {
        assert_eq!(MenuCommand::from_choice("1"), Some(MenuCommand::Create));
        assert_eq!(MenuCommand::from_choice(" 2 "), Some(MenuCommand::List));
        assert_eq!(MenuCommand::from_choice("3"), Some(MenuCommand::Update));
        assert_eq!(MenuCommand::from_choice("4"), Some(MenuCommand::Delete));
        assert_eq!(MenuCommand::from_choice("5"), Some(MenuCommand::Exit));
        assert_eq!(MenuCommand::from_choice("6"), None);
        assert_eq!(MenuCommand::from_choice(""), None);
    }

    #[test]
    fn create_and_list() {
        let (service, out) = run_session("1\nWidget\n10\n9,99\n2\n5\n");

        assert!(out.contains("Product created with ID 1."));
        assert!(out.contains("ID: 1 | Name: Widget | Quantity: 10 | Price: 9.99"));
        assert!(out.trim_end().ends_with("Goodbye."));
        assert_eq!(service.list_products().unwrap().len(), 1);
    }

    #[test]
    fn empty_listing_message() {
        let (_, out) = run_session("2\n5\n");
        assert!(out.contains("No products registered."));
    }

    #[test]
    fn invalid_option_keeps_looping() {
        let (_, out) = run_session("9\nabc\n5\n");
        assert_eq!(out.matches("Invalid option. Try again.").count(), 2);
        assert!(out.contains("Goodbye."));
    }

    #[test]
    fn parse_error_skips_the_operation() {
        let (service, out) = run_session("1\nWidget\nten\n1.5\n5\n");

        assert!(out.contains("Error: 'ten' is not a valid whole number."));
        assert!(!out.contains("Product created"));
        assert!(service.list_products().unwrap().is_empty());
    }

    #[test]
    fn failures_are_reported_and_loop_continues() {
        let script = concat!(
            "1\n   \n1\n1\n",     // empty name
            "1\nWidget\n-1\n1\n", // negative quantity
            "1\nWidget\n1\n1\n",
            "1\nWidget\n2\n2\n",  // duplicate
            "4\n99\n",            // missing id
            "3\n99\n1\n1\n",      // missing id
            "5\n",
        );
        let (service, out) = run_session(script);

        assert!(out.contains("Error: invalid input (empty name)."));
        assert!(out.contains("Error: invalid input (quantity out of range)."));
        assert!(out.contains("Error: a product named 'Widget' already exists."));
        assert_eq!(out.matches("Error: product not found.").count(), 2);
        assert!(out.contains("Goodbye."));
        assert_eq!(service.list_products().unwrap().len(), 1);
    }

    #[test]
    fn store_failures_keep_the_menu_running() {
        let script = concat!(
            "2\n",          // list
            "1\nX\n1\n1\n", // create
            "3\n1\n1\n1\n", // update
            "4\n1\n",       // delete
            "5\n",
        );
        let mut menu = Menu::new(ProductService::new(BrokenStore), script.as_bytes(), Vec::new());
        menu.run().unwrap();
        let (_, out) = menu.into_parts();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(out.matches("Database error: unable to open database file").count(), 4);
        assert!(out.trim_end().ends_with("Goodbye."));
    }

    #[test]
    fn update_echoes_new_values() {
        let service = ProductService::new(InMemoryProductStore::new());
        service.create_product("Gadget", 5, 1.5).unwrap();

        let (service, out) = run_with(service, "3\n1\n7\n2,00\n5\n");

        assert!(out.contains("Product updated."));
        assert!(out.contains("ID: 1 | Name: Gadget | Quantity: 7 | Price: 2.00"));
        let product = service.get_product(1).unwrap();
        assert_eq!((product.quantity(), product.price()), (7, 2.0));
    }

    #[test]
    fn delete_then_delete_again() {
        let service = ProductService::new(InMemoryProductStore::new());
        service.create_product("Gadget", 5, 1.5).unwrap();

        let (service, out) = run_with(service, "4\n1\n4\n1\n5\n");

        assert!(out.contains("Product deleted."));
        assert!(out.contains("Error: product not found."));
        assert!(service.list_products().unwrap().is_empty());
    }

    #[test]
    fn end_of_input_ends_the_loop() {
        let (_, out) = run_session("2\n");
        assert!(out.contains("No products registered."));
        assert!(!out.contains("Goodbye."));

        // Input ending mid-operation is also a clean exit.
        let (service, _) = run_session("1\nWidget\n");
        assert!(service.list_products().unwrap().is_empty());
    }

    #[test]
    fn describe_messages() {
        assert_eq!(
            describe(&ServiceError::StoreUnavailable("disk full".into())),
            "Database error: disk full"
        );
        assert_eq!(
            describe(&ServiceError::Validation("negative price".into())),
            "Error: invalid input (negative price)."
        );
    }
}
