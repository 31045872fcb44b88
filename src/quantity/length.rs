quantity!(Metres, suffix: "m", precision: 2);
