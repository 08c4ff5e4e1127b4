//! Demo rows: a small car inventory.

use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;
use tableview::prelude::*;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub object_id: String,
    pub year: u16,
    pub make: String,
    pub model: String,
    pub category: String,
}

impl Car {
    fn new(object_id: &str, year: u16, make: &str, model: &str, category: &str) -> Self {
        Self {
            object_id: object_id.to_string(),
            year,
            make: make.to_string(),
            model: model.to_string(),
            category: category.to_string(),
        }
    }
}

impl TableRow for Car {
    type Key = String;
    type Cell = String;

    fn key(&self) -> String {
        self.object_id.clone()
    }

    fn cell(&self, column_index: usize) -> String {
        match column_index {
            0 => self.year.to_string(),
            2 => self.make.clone(),
            3 => self.model.clone(),
            4 => self.category.clone(),
            5 => format!("{} - {}", self.make, self.model),
            _ => String::new(),
        }
    }
}

/// Column layout matching [`Car::cell`].
pub fn columns() -> Vec<Column<Car>> {
    vec![
        Column::new("Year")
            .fixed(6)
            .align(Alignment::Right)
            .sort(SortDescriptor::by_key(|c: &Car| c.year)),
        Column::divider(),
        Column::new("Make")
            .min_width(10)
            .sort(SortDescriptor::by_key(|c: &Car| c.make.clone())),
        Column::new("Model")
            .min_width(12)
            .sort(SortDescriptor::by_key(|c: &Car| c.model.clone())),
        Column::new("Category")
            .ideal_width(12)
            .text_color("cyan")
            .sort(SortDescriptor::by_key(|c: &Car| c.category.clone())),
        Column::new("Make - Model")
            .max_width(24)
            .align(Alignment::Center)
            .sort(SortDescriptor::new(|a: &Car, b: &Car| {
                a.make.cmp(&b.make).then_with(|| a.model.cmp(&b.model))
            })),
    ]
}

/// Load rows from a JSON array of cars.
pub fn load(path: &Path) -> Result<Vec<Car>, AppError> {
    let text = fs::read_to_string(path)?;
    let cars: Vec<Car> = serde_json::from_str(&text)?;
    info!("Loaded {} rows from {}", cars.len(), path.display());
    Ok(cars)
}

/// Built-in rows used when no data file is given.
pub fn sample() -> Vec<Car> {
    vec![
        Car::new("c01", 2004, "Saab", "9-3", "Sedan"),
        Car::new("c02", 1999, "Volvo", "V70", "Wagon"),
        Car::new("c03", 2012, "Audi", "A4", "Sedan"),
        Car::new("c04", 1987, "BMW", "M3", "Coupe"),
        Car::new("c05", 2020, "Kia", "Ceed", "Hatchback"),
        Car::new("c06", 2016, "Toyota", "Hilux", "Pickup"),
        Car::new("c07", 2008, "Honda", "Civic", "Hatchback"),
        Car::new("c08", 1995, "Mazda", "MX-5", "Convertible"),
        Car::new("c09", 2018, "Tesla", "Model 3", "Sedan"),
        Car::new("c10", 2001, "Ford", "Focus", "Wagon"),
        Car::new("c11", 2022, "Skoda", "Octavia", "Wagon"),
        Car::new("c12", 1991, "Lancia", "Delta", "Hatchback"),
        Car::new("c13", 2010, "Subaru", "Outback", "Wagon"),
        Car::new("c14", 2014, "Porsche", "Cayman", "Coupe"),
        Car::new("c15", 2006, "Peugeot", "307", "Hatchback"),
        Car::new("c16", 2019, "Volkswagen", "Golf", "Hatchback"),
        Car::new("c17", 1983, "Jeep", "Cherokee", "SUV"),
        Car::new("c18", 2021, "Hyundai", "Ioniq 5", "SUV"),
    ]
}
