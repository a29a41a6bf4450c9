pub mod p900_profit_register;
