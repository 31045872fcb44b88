quantity!(
    /// Euro per kilowatt-hour.
    KilowattHourRate,
    suffix: "€/kWh",
    precision: 4
);
